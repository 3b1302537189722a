use super::*;
use crate::application::config::AppConfig;
use crate::application::session_mocks::*;
use crate::display::DisplayCall;
use crate::export::{ClasspathResult, MainClassInfo, ProjectInfo};
use crate::primitives::ClasspathScope;
use std::fs;
use tempfile::TempDir;

fn project(name: &str, path: &Path) -> ProjectInfo {
    ProjectInfo::from_path(name, path).unwrap()
}

fn demo_session() -> MockCommandSession {
    MockCommandSession::new().with_build_support(
        MockBuildSupportProvider::new()
            .with_projects(vec![project("app", Path::new("/workspace/demo/app"))]),
    )
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"x").unwrap();
}

#[test]
fn test_guard_released_on_drop() {
    let controller = PipelineController::new();
    {
        let _guard = controller.try_acquire().unwrap();
        assert!(controller.is_busy());
        assert!(controller.try_acquire().is_none());
    }
    assert!(!controller.is_busy());
}

#[test]
fn test_global_controller_is_shared() {
    assert!(std::ptr::eq(PipelineController::global(), PipelineController::global()));
}

#[tokio::test]
async fn test_export_end_to_end() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let out = root.join("out");
    touch(&out.join("com/example/A.class"));
    touch(&out.join("com/example/B.class"));
    touch(&root.join("lib/dep.jar"));

    let runtime = ClasspathResult {
        classpaths: vec![
            out.to_string_lossy().to_string(),
            root.join("lib/dep.jar").to_string_lossy().to_string(),
        ],
        modulepaths: Vec::new(),
    };
    let session = MockCommandSession::new()
        .with_config(AppConfig {
            folders: vec![root.to_path_buf()],
            ..AppConfig::default()
        })
        .with_build_support(
            MockBuildSupportProvider::new()
                .with_projects(vec![project("app", root)])
                .with_classpath("app", ClasspathScope::Runtime, runtime)
                .with_main_classes(vec![MainClassInfo {
                    name: "com.example.A".to_string(),
                    path: root.join("src/com/example/A.java"),
                }]),
        );

    let mut seed = StepMetadata::new(None);
    seed.elements = vec![
        "${compile-output}".to_string(),
        "${runtime-dependencies}".to_string(),
    ];

    let controller = PipelineController::new();
    let outcome = controller.export(&session, seed).await;

    let folder_name = root.file_name().unwrap().to_string_lossy().to_string();
    let expected = root.join(format!("{}.jar", folder_name));
    match outcome {
        ExportOutcome::Exported(path) => assert_eq!(path, expected),
        other => panic!("expected export, got {:?}", other),
    }
    assert!(!controller.is_busy());

    let requests = session.archive_provider.get_requests();
    assert_eq!(requests.len(), 1);
    let mut destinations: Vec<&str> = requests[0]
        .sources
        .iter()
        .map(|entry| entry.destination.as_str())
        .collect();
    destinations.sort();
    assert_eq!(destinations, vec!["com/example/A.class", "com/example/B.class"]);
    assert_eq!(requests[0].dependencies.len(), 1);
    assert!(requests[0].dependencies[0].ends_with("lib/dep.jar"));
    assert_eq!(requests[0].main_class.as_deref(), Some("com.example.A"));

    assert!(session.display_provider.has_call(&DisplayCall::StatusSuccess {
        item: "Successfully exported jar to".to_string(),
        details: expected.display().to_string(),
    }));
}

#[tokio::test]
async fn test_second_export_while_running_is_busy() {
    let gate = MockGate::new();
    let session = MockCommandSession::new().with_build_support(
        MockBuildSupportProvider::new()
            .with_projects(vec![project("app", Path::new("/workspace/demo/app"))])
            .with_gate(gate.clone()),
    );
    let controller = PipelineController::new();

    let first = controller.export(&session, StepMetadata::new(None));
    let second = async {
        gate.wait_entered().await;
        assert!(controller.is_busy());
        let outcome = controller.export(&session, StepMetadata::new(None)).await;
        gate.release();
        outcome
    };
    let (first, second) = tokio::join!(first, second);

    assert!(matches!(second, ExportOutcome::Busy));
    assert!(first.is_success());
    assert_eq!(session.build_support_provider.count_project_queries(), 1);
    assert_eq!(session.archive_provider.get_requests().len(), 1);
    assert_eq!(session.display_provider.count_calls("status_warning"), 1);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_back_to_project_restarts_outer_loop() {
    let session = MockCommandSession::new()
        .with_config(AppConfig {
            folders: vec![PathBuf::from("/ws/a"), PathBuf::from("/ws/b")],
            ..AppConfig::default()
        })
        .with_build_support(
            MockBuildSupportProvider::new()
                .with_projects(vec![project("app", Path::new("/ws/a/app"))])
                .with_main_classes(vec![MainClassInfo {
                    name: "App".to_string(),
                    path: PathBuf::from("/ws/a/app/src/App.java"),
                }]),
        )
        .with_interactive(
            MockInteractiveProvider::new()
                .with_fuzzy_select(Some(0)) // folder a
                .with_fuzzy_select(Some(0)) // back
                .with_fuzzy_select(Some(1)) // folder b
                .with_fuzzy_select(Some(1)), // App
        );

    let outcome = PipelineController::new()
        .export(&session, StepMetadata::new(None))
        .await;

    match outcome {
        ExportOutcome::Exported(path) => assert_eq!(path, PathBuf::from("/ws/b/b.jar")),
        other => panic!("expected export, got {:?}", other),
    }
    assert_eq!(session.build_support_provider.count_project_queries(), 2);
    let requests = session.archive_provider.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].main_class.as_deref(), Some("App"));
}

#[tokio::test]
async fn test_inner_loop_exits_on_back_without_output() {
    let session = demo_session().with_build_support(
        MockBuildSupportProvider::new().with_main_classes(vec![MainClassInfo {
            name: "App".to_string(),
            path: PathBuf::from("/workspace/demo/src/App.java"),
        }]),
    );
    let mut metadata = StepMetadata::new(None);
    metadata.workspace_folder = Some(crate::export::WorkspaceFolder::from_path("/workspace/demo"));
    metadata.steps.push(ExportStep::ResolveProject);

    let result = create_archive(&mut metadata, &session).await.unwrap();

    assert_eq!(result, None);
    assert!(metadata.back_to_project_step);
    assert!(metadata.output_path.is_none());
    assert!(session.archive_provider.get_requests().is_empty());
}

#[tokio::test]
async fn test_precondition_failures_abort_silently() {
    let not_ready = MockCommandSession::new()
        .with_build_support(MockBuildSupportProvider::new().with_server_ready(false));
    let controller = PipelineController::new();

    let outcome = controller.export(&not_ready, StepMetadata::new(None)).await;
    assert!(matches!(outcome, ExportOutcome::Aborted));
    assert_eq!(not_ready.build_support_provider.count_project_queries(), 0);
    assert!(!controller.is_busy());

    let build_failed = MockCommandSession::new()
        .with_build_support(MockBuildSupportProvider::new().with_build_result(false));
    let outcome = controller.export(&build_failed, StepMetadata::new(None)).await;
    assert!(matches!(outcome, ExportOutcome::Aborted));
    assert_eq!(build_failed.build_support_provider.count_project_queries(), 0);
    assert!(build_failed.archive_provider.get_requests().is_empty());
}

#[tokio::test]
async fn test_no_project_found_is_reported() {
    let session = MockCommandSession::new();
    let controller = PipelineController::new();

    let outcome = controller.export(&session, StepMetadata::new(None)).await;

    assert!(matches!(
        outcome,
        ExportOutcome::Failed(ExportError::NoProjectFound { .. })
    ));
    assert_eq!(session.display_provider.count_calls("status_error"), 1);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_invalid_token_reports_handler() {
    let session = demo_session();
    let mut seed = StepMetadata::new(None);
    seed.elements = vec!["compile-output".to_string()];

    let outcome = PipelineController::new().export(&session, seed).await;

    match outcome {
        ExportOutcome::Failed(error) => assert!(error.handler().is_some()),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(session.display_provider.has_call(&DisplayCall::StatusInfo {
        message: "Migrate saved tasks: run `jarpack tasks migrate`".to_string(),
    }));
    assert!(session.archive_provider.get_requests().is_empty());
}

#[tokio::test]
async fn test_escape_at_main_class_cancels() {
    let session = demo_session()
        .with_build_support(
            MockBuildSupportProvider::new()
                .with_projects(vec![project("app", Path::new("/workspace/demo/app"))])
                .with_main_classes(vec![MainClassInfo {
                    name: "App".to_string(),
                    path: PathBuf::from("/workspace/demo/src/App.java"),
                }]),
        )
        .with_interactive(MockInteractiveProvider::new().with_fuzzy_select(None));

    let outcome = PipelineController::new()
        .export(&session, StepMetadata::new(None))
        .await;

    assert!(matches!(outcome, ExportOutcome::Cancelled));
    assert_eq!(session.display_provider.count_calls("status_error"), 0);
    assert!(session.archive_provider.get_requests().is_empty());
}

#[tokio::test]
async fn test_execute_step_finish_is_terminal() {
    let session = demo_session();
    let mut metadata = StepMetadata::new(None);

    let next = execute_step(ExportStep::Finish, &mut metadata, &session)
        .await
        .unwrap();

    assert_eq!(next, ExportStep::Finish);
    assert!(session.build_support_provider.get_calls().is_empty());
}
