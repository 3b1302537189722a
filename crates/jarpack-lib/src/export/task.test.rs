use super::*;
use tempfile::TempDir;

fn folder() -> WorkspaceFolder {
    WorkspaceFolder::from_path("/ws/demo")
}

fn project(name: &str) -> ProjectInfo {
    ProjectInfo::from_path(name, &Path::new("/ws/demo").join(name)).unwrap()
}

fn definition(name: &str, elements: &[&str]) -> ExportTaskDefinition {
    ExportTaskDefinition {
        name: name.to_string(),
        elements: elements.iter().map(|e| e.to_string()).collect(),
        main_class: None,
        target_path: None,
        manifest_path: None,
    }
}

#[test]
fn test_default_definition_single_project() {
    let definition = default_definition(&folder(), &[project("app")]);

    assert_eq!(definition.name, "demo");
    assert_eq!(
        definition.elements,
        vec![
            "${compile-output}",
            "${test-compile-output}",
            "${runtime-dependencies}",
            "${test-dependencies}",
        ]
    );
    assert_eq!(definition.target_path.as_deref(), Some(DEFAULT_TARGET_PATH));
}

#[test]
fn test_default_definition_several_projects() {
    let definition = default_definition(&folder(), &[project("core"), project("cli")]);

    assert_eq!(
        definition.elements,
        vec![
            "${compile-output:core}",
            "${test-compile-output:core}",
            "${compile-output:cli}",
            "${test-compile-output:cli}",
            "${runtime-dependencies}",
            "${test-dependencies}",
        ]
    );
}

#[test]
fn test_from_metadata_then_resolve() {
    let mut metadata = StepMetadata::new(None);
    metadata.elements = vec!["${compile-output}".to_string()];
    metadata.selected_main_method = Some("com.example.App".to_string());
    metadata.output_path = Some(OutputTarget::Path(PathBuf::from("/ws/demo/dist/app.jar")));

    let task = ExportTask::from_metadata("release", &metadata);
    assert_eq!(task.source, TaskSource::Saved);
    assert_eq!(task.definition.target_path.as_deref(), Some("/ws/demo/dist/app.jar"));

    let replay = task.resolve(&folder());
    assert_eq!(replay.entry, Some(PathBuf::from("/ws/demo")));
    assert_eq!(replay.elements, metadata.elements);
    assert_eq!(replay.main_class(), Some("com.example.App"));
    assert_eq!(replay.output_path, metadata.output_path);
}

#[test]
fn test_resolve_substitutes_target_and_manifest() {
    let mut definition = definition("app", &["${compile-output}"]);
    definition.target_path = Some(DEFAULT_TARGET_PATH.to_string());
    definition.manifest_path = Some(PathBuf::from("META-INF/custom.mf"));
    let task = ExportTask {
        definition,
        source: TaskSource::Saved,
    };

    let metadata = task.resolve(&folder());

    assert_eq!(
        metadata.output_path,
        Some(OutputTarget::Path(PathBuf::from("/ws/demo/demo.jar")))
    );
    assert_eq!(
        metadata.manifest_path,
        Some(PathBuf::from("/ws/demo/META-INF/custom.mf"))
    );
    assert!(metadata.selected_main_method.is_none());
}

#[test]
fn test_store_missing_file_is_empty() {
    let temp = TempDir::new().unwrap();
    let store = TaskStore::for_folder(temp.path());

    assert!(store.list().unwrap().is_empty());
    assert!(store.get("anything").unwrap().is_none());
    assert!(!store.path().exists());
}

#[test]
fn test_store_save_replaces_by_name() {
    let temp = TempDir::new().unwrap();
    let store = TaskStore::for_folder(temp.path());

    store.save(definition("app", &["${compile-output}"])).unwrap();
    store.save(definition("tools", &["lib/**"])).unwrap();
    store
        .save(definition("app", &["${compile-output}", "${runtime-dependencies}"]))
        .unwrap();

    let tasks = store.list().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].name, "app");
    assert_eq!(tasks[0].elements.len(), 2);
    assert_eq!(store.get("tools").unwrap().unwrap().elements, vec!["lib/**"]);
    assert_eq!(
        store.path(),
        temp.path().join(".jarpack").join("tasks.toml").as_path()
    );
}

#[test]
fn test_store_migrates_bare_tokens() {
    let temp = TempDir::new().unwrap();
    let store = TaskStore::for_folder(temp.path());
    store
        .save(definition(
            "legacy",
            &["compile-output:app", "runtime-dependencies", "!test-compile-output", "lib/*.jar"],
        ))
        .unwrap();

    assert_eq!(store.migrate().unwrap(), 3);
    assert_eq!(
        store.get("legacy").unwrap().unwrap().elements,
        vec![
            "${compile-output:app}",
            "${runtime-dependencies}",
            "!${test-compile-output}",
            "lib/*.jar",
        ]
    );
    assert_eq!(store.migrate().unwrap(), 0);
}

#[test]
fn test_store_reports_parse_errors() {
    let temp = TempDir::new().unwrap();
    let store = TaskStore::for_folder(temp.path());
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "[[tasks]\nname = ").unwrap();

    assert!(matches!(store.list(), Err(TaskStoreError::Parse { .. })));
}
