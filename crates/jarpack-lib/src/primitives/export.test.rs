use super::*;

#[test]
fn test_export_step_display() {
    assert_eq!(ExportStep::ResolveProject.to_string(), "resolve-project");
    assert_eq!(ExportStep::ResolveMainMethod.to_string(), "resolve-main-method");
    assert_eq!(ExportStep::GenerateJar.to_string(), "generate-jar");
    assert_eq!(ExportStep::Finish.to_string(), "finish");
}

#[test]
fn test_finish_has_no_executor() {
    assert!(ExportStep::ResolveProject.is_executable());
    assert!(ExportStep::GenerateJar.is_executable());
    assert!(!ExportStep::Finish.is_executable());
}

#[test]
fn test_classpath_scope_parse() {
    assert_eq!(
        "runtime".parse::<ClasspathScope>().unwrap(),
        ClasspathScope::Runtime
    );
    assert_eq!("TEST".parse::<ClasspathScope>().unwrap(), ClasspathScope::Test);
    assert!("compile".parse::<ClasspathScope>().is_err());
}

#[test]
fn test_export_step_serde_names() {
    let json = serde_json::to_string(&ExportStep::ResolveMainMethod).unwrap();
    assert_eq!(json, "\"resolve-main-method\"");
}
