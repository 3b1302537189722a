use super::*;

fn folder() -> WorkspaceFolder {
    WorkspaceFolder::from_path("/ws/demo")
}

#[test]
fn test_workspace_folder_name_from_path() {
    let folder = folder();
    assert_eq!(folder.name, "demo");
    assert_eq!(folder.uri().unwrap().as_str(), "file:///ws/demo/");
}

#[test]
fn test_project_info_round_trips_path() {
    let project = ProjectInfo::from_path("core", Path::new("/ws/demo/core")).unwrap();
    assert_eq!(project.path().unwrap(), PathBuf::from("/ws/demo/core"));
    assert!(ProjectInfo::from_path("rel", Path::new("relative/dir")).is_err());
}

#[test]
fn test_output_target_substitutes_variables() {
    let target = OutputTarget::resolve("${workspaceFolder}/${workspaceFolderBasename}.jar", &folder());
    assert_eq!(target, OutputTarget::Path(PathBuf::from("/ws/demo/demo.jar")));
}

#[test]
fn test_output_target_folder_gets_jar_name() {
    assert_eq!(
        OutputTarget::resolve("${workspaceFolder}", &folder()),
        OutputTarget::Path(PathBuf::from("/ws/demo/demo.jar"))
    );
    assert_eq!(
        OutputTarget::resolve("dist", &folder()),
        OutputTarget::Path(PathBuf::from("/ws/demo/dist/demo.jar"))
    );
}

#[test]
fn test_output_target_ask_user_sentinel() {
    assert_eq!(OutputTarget::resolve("Browse...", &folder()), OutputTarget::AskUser);
    assert!(OutputTarget::AskUser.as_path().is_none());
}

#[test]
fn test_go_back_to_project_sets_restart_flag() {
    let mut metadata = StepMetadata::new(None);
    metadata.steps.push(ExportStep::ResolveProject);
    metadata.steps.push(ExportStep::ResolveMainMethod);

    assert_eq!(metadata.go_back(), ExportStep::ResolveMainMethod);
    assert!(!metadata.back_to_project_step);
    assert_eq!(metadata.go_back(), ExportStep::ResolveProject);
    assert!(metadata.back_to_project_step);
    assert!(!metadata.can_go_back());
}

#[test]
fn test_main_class_ignores_explicit_none() {
    let mut metadata = StepMetadata::new(None);
    assert_eq!(metadata.main_class(), None);
    metadata.selected_main_method = Some(String::new());
    assert_eq!(metadata.main_class(), None);
    metadata.selected_main_method = Some("com.acme.App".to_string());
    assert_eq!(metadata.main_class(), Some("com.acme.App"));
}

#[test]
fn test_workspace_folder_required() {
    let metadata = StepMetadata::new(None);
    assert!(metadata.workspace_folder().is_err());
}
