use super::*;
use crate::application::session_mocks::*;
use crate::display::DisplayCall;
use crate::export::{ExportTaskDefinition, MainClassInfo, ProjectInfo};
use tempfile::TempDir;

fn workspace_session(root: &Path) -> MockCommandSession {
    MockCommandSession::new()
        .with_config(AppConfig {
            workdir: Some(root.to_path_buf()),
            folders: vec![root.to_path_buf()],
            ..AppConfig::default()
        })
        .with_build_support(
            MockBuildSupportProvider::new()
                .with_projects(vec![ProjectInfo::from_path("app", &root.join("app")).unwrap()]),
        )
}

fn folder_name(root: &Path) -> String {
    root.file_name().unwrap().to_string_lossy().to_string()
}

fn export_command() -> Commands {
    Commands::Export {
        path: None,
        main_class: None,
        output: None,
        manifest: None,
        elements: Vec::new(),
        save_as: None,
    }
}

async fn run(command: Commands, session: &MockCommandSession) -> Result<()> {
    execute_command_with_controller(command, session, &PipelineController::new()).await
}

#[tokio::test]
async fn test_version_command() {
    let session = MockCommandSession::new();
    run(Commands::Version, &session).await.unwrap();

    assert!(session.display_provider.has_call(&DisplayCall::StatusMessage {
        text: format!("jarpack {}", env!("CARGO_PKG_VERSION")),
    }));
}

#[tokio::test]
async fn test_export_uses_default_elements() {
    let temp = TempDir::new().unwrap();
    let session = workspace_session(temp.path());

    run(export_command(), &session).await.unwrap();

    let requests = session.archive_provider.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].output_path,
        temp.path().join(format!("{}.jar", folder_name(temp.path())))
    );
    assert!(session.build_support_provider.get_calls().contains(
        &BuildSupportCall::GetClasspaths {
            project: "app".to_string(),
            scope: crate::primitives::ClasspathScope::Runtime,
        }
    ));
}

#[tokio::test]
async fn test_export_output_and_save_as() {
    let temp = TempDir::new().unwrap();
    let session = workspace_session(temp.path());

    let command = Commands::Export {
        path: None,
        main_class: Some("com.example.App".to_string()),
        output: Some("dist/app.jar".to_string()),
        manifest: None,
        elements: vec!["${compile-output:app}".to_string()],
        save_as: Some("release".to_string()),
    };
    run(command, &session).await.unwrap();

    let expected = temp.path().join("dist/app.jar");
    let requests = session.archive_provider.get_requests();
    assert_eq!(requests[0].output_path, expected);
    assert_eq!(requests[0].main_class.as_deref(), Some("com.example.App"));
    assert!(session.interactive_provider.get_fuzzy_select_calls().is_empty());

    let saved = TaskStore::for_folder(temp.path()).get("release").unwrap().unwrap();
    assert_eq!(saved.elements, vec!["${compile-output:app}"]);
    assert_eq!(saved.main_class.as_deref(), Some("com.example.App"));
    assert_eq!(
        saved.target_path.as_deref(),
        Some(expected.to_string_lossy().as_ref())
    );
}

#[tokio::test]
async fn test_export_failure_is_an_error() {
    let temp = TempDir::new().unwrap();
    let session = MockCommandSession::new().with_config(AppConfig {
        workdir: Some(temp.path().to_path_buf()),
        folders: vec![temp.path().to_path_buf()],
        ..AppConfig::default()
    });

    let result = run(export_command(), &session).await;

    assert!(result.is_err());
    assert_eq!(session.display_provider.count_calls("status_error"), 1);
}

#[tokio::test]
async fn test_export_cancel_is_clean() {
    let temp = TempDir::new().unwrap();
    let session = workspace_session(temp.path())
        .with_build_support(
            MockBuildSupportProvider::new()
                .with_projects(vec![ProjectInfo::from_path("app", &temp.path().join("app")).unwrap()])
                .with_main_classes(vec![MainClassInfo {
                    name: "App".to_string(),
                    path: temp.path().join("app/src/App.java"),
                }]),
        )
        .with_interactive(MockInteractiveProvider::new().with_fuzzy_select(None));

    run(export_command(), &session).await.unwrap();

    assert!(session.archive_provider.get_requests().is_empty());
    assert!(session.display_provider.has_call(&DisplayCall::StatusInfo {
        message: "Export cancelled".to_string(),
    }));
}

#[tokio::test]
async fn test_run_saved_task() {
    let temp = TempDir::new().unwrap();
    let session = workspace_session(temp.path());
    TaskStore::for_folder(temp.path())
        .save(ExportTaskDefinition {
            name: "nightly".to_string(),
            elements: vec!["${runtime-dependencies}".to_string()],
            main_class: Some(String::new()),
            target_path: Some("out/nightly.jar".to_string()),
            manifest_path: None,
        })
        .unwrap();

    let command = Commands::Run {
        name: "nightly".to_string(),
        path: None,
    };
    run(command, &session).await.unwrap();

    let requests = session.archive_provider.get_requests();
    assert_eq!(requests[0].output_path, temp.path().join("out/nightly.jar"));
    assert_eq!(requests[0].main_class, None);
    assert!(
        !session
            .build_support_provider
            .get_calls()
            .iter()
            .any(|call| matches!(call, BuildSupportCall::GetMainClasses { .. }))
    );
}

#[tokio::test]
async fn test_run_default_task_by_folder_name() {
    let temp = TempDir::new().unwrap();
    let session = workspace_session(temp.path());

    let command = Commands::Run {
        name: folder_name(temp.path()),
        path: None,
    };
    run(command, &session).await.unwrap();

    assert_eq!(session.archive_provider.get_requests().len(), 1);
}

#[tokio::test]
async fn test_run_unknown_task() {
    let temp = TempDir::new().unwrap();
    let session = workspace_session(temp.path());

    let command = Commands::Run {
        name: "missing".to_string(),
        path: None,
    };
    let error = run(command, &session).await.unwrap_err();

    assert!(error.to_string().contains("No task named 'missing'"));
    assert!(session.archive_provider.get_requests().is_empty());
}

#[tokio::test]
async fn test_tasks_json_lists_default_and_saved() {
    let temp = TempDir::new().unwrap();
    let session = workspace_session(temp.path());
    TaskStore::for_folder(temp.path())
        .save(ExportTaskDefinition {
            name: "release".to_string(),
            elements: vec!["${compile-output}".to_string()],
            main_class: None,
            target_path: None,
            manifest_path: None,
        })
        .unwrap();

    run(
        Commands::Tasks {
            json: true,
            action: None,
        },
        &session,
    )
    .await
    .unwrap();

    let rendered = session
        .display_provider
        .get_calls()
        .into_iter()
        .find_map(|call| match call {
            DisplayCall::StatusMessage { text } => Some(text),
            _ => None,
        })
        .unwrap();
    let tasks: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["source"], "default");
    assert_eq!(tasks[1]["name"], "release");
    assert_eq!(tasks[1]["source"], "saved");
}

#[tokio::test]
async fn test_tasks_migrate_rewrites_saved_tasks() {
    let temp = TempDir::new().unwrap();
    let session = workspace_session(temp.path());
    let store = TaskStore::for_folder(temp.path());
    store
        .save(ExportTaskDefinition {
            name: "legacy".to_string(),
            elements: vec!["compile-output".to_string(), "runtime-dependencies".to_string()],
            main_class: None,
            target_path: None,
            manifest_path: None,
        })
        .unwrap();

    run(
        Commands::Tasks {
            json: false,
            action: Some(TaskAction::Migrate),
        },
        &session,
    )
    .await
    .unwrap();

    assert_eq!(
        store.get("legacy").unwrap().unwrap().elements,
        vec!["${compile-output}", "${runtime-dependencies}"]
    );
    assert_eq!(session.display_provider.count_calls("status_success"), 1);
}
