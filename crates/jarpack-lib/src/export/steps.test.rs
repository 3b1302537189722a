use super::*;
use crate::application::config::AppConfig;
use crate::application::session_mocks::*;
use crate::export::{ClasspathEntry, MainClassInfo, ProjectInfo, SETTING_ASK_USER};
use std::path::{Path, PathBuf};

fn project(name: &str) -> ProjectInfo {
    ProjectInfo::from_path(name, &Path::new("/workspace/demo").join(name)).unwrap()
}

fn main_class(name: &str) -> MainClassInfo {
    MainClassInfo {
        name: name.to_string(),
        path: PathBuf::from(format!("/workspace/demo/src/{}.java", name)),
    }
}

fn resolved_metadata() -> StepMetadata {
    let mut metadata = StepMetadata::new(None);
    metadata.workspace_folder = Some(WorkspaceFolder::from_path("/workspace/demo"));
    metadata.project_list = vec![project("app")];
    metadata
}

fn config_with(folders: &[&str], target_folder: &str) -> AppConfig {
    AppConfig {
        folders: folders.iter().map(PathBuf::from).collect(),
        target_folder: target_folder.to_string(),
        ..AppConfig::default()
    }
}

#[test]
fn test_executor_for_step() {
    assert_eq!(
        StepExecutor::for_step(ExportStep::ResolveMainMethod),
        Some(StepExecutor::ResolveMainMethod)
    );
    assert_eq!(StepExecutor::for_step(ExportStep::Finish), None);
    assert_eq!(StepExecutor::GenerateJar.step(), ExportStep::GenerateJar);
}

#[tokio::test]
async fn test_resolve_project_single_folder() {
    let session = MockCommandSession::new()
        .with_build_support(MockBuildSupportProvider::new().with_projects(vec![project("app")]));
    let mut metadata = StepMetadata::new(None);

    let next = StepExecutor::ResolveProject
        .execute(&mut metadata, &session)
        .await
        .unwrap();

    assert_eq!(next, ExportStep::ResolveMainMethod);
    assert_eq!(metadata.workspace_folder().unwrap().name, "demo");
    assert_eq!(metadata.project_list, vec![project("app")]);
    assert!(metadata.steps.is_empty());
    assert!(session.interactive_provider.get_fuzzy_select_calls().is_empty());
}

#[tokio::test]
async fn test_resolve_project_uses_folder_containing_entry() {
    let session = MockCommandSession::new()
        .with_config(config_with(&["/ws", "/ws/nested"], "${workspaceFolder}"))
        .with_build_support(MockBuildSupportProvider::new().with_projects(vec![project("app")]));
    let mut metadata = StepMetadata::new(Some(PathBuf::from("/ws/nested/module")));

    StepExecutor::ResolveProject
        .execute(&mut metadata, &session)
        .await
        .unwrap();

    assert_eq!(metadata.workspace_folder().unwrap().path, PathBuf::from("/ws/nested"));
    assert!(session.interactive_provider.get_fuzzy_select_calls().is_empty());
}

#[tokio::test]
async fn test_resolve_project_without_projects() {
    let session = MockCommandSession::new();
    let mut metadata = StepMetadata::new(None);

    let result = StepExecutor::ResolveProject.execute(&mut metadata, &session).await;

    assert!(matches!(result, Err(ExportError::NoProjectFound { .. })));
    assert!(metadata.workspace_folder.is_none());
}

#[tokio::test]
async fn test_resolve_project_prompts_between_folders() {
    let session = MockCommandSession::new()
        .with_config(config_with(&["/ws/a", "/ws/b"], "${workspaceFolder}"))
        .with_build_support(MockBuildSupportProvider::new().with_projects(vec![project("app")]))
        .with_interactive(MockInteractiveProvider::new().with_fuzzy_select(Some(1)));
    let mut metadata = StepMetadata::new(None);

    StepExecutor::ResolveProject
        .execute(&mut metadata, &session)
        .await
        .unwrap();

    assert_eq!(metadata.workspace_folder().unwrap().name, "b");
    assert_eq!(metadata.steps, vec![ExportStep::ResolveProject]);
    let calls = session.interactive_provider.get_fuzzy_select_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.len(), 2);
}

#[tokio::test]
async fn test_resolve_project_folder_prompt_escape() {
    let session = MockCommandSession::new()
        .with_config(config_with(&["/ws/a", "/ws/b"], "${workspaceFolder}"))
        .with_interactive(MockInteractiveProvider::new().with_fuzzy_select(None));
    let mut metadata = StepMetadata::new(None);

    let result = StepExecutor::ResolveProject.execute(&mut metadata, &session).await;

    assert!(matches!(result, Err(ExportError::Cancelled)));
    assert_eq!(session.build_support_provider.count_project_queries(), 0);
}

#[tokio::test]
async fn test_resolve_project_yes_mode_records_no_steps() {
    let session = MockCommandSession::new()
        .with_config(config_with(&["/ws/a", "/ws/b"], "${workspaceFolder}"))
        .with_build_support(MockBuildSupportProvider::new().with_projects(vec![project("app")]))
        .with_interactive(MockInteractiveProvider::new().with_yes_mode(true));
    let mut metadata = StepMetadata::new(None);

    StepExecutor::ResolveProject
        .execute(&mut metadata, &session)
        .await
        .unwrap();

    assert_eq!(metadata.workspace_folder().unwrap().name, "a");
    assert!(!metadata.can_go_back());
}

#[tokio::test]
async fn test_resolve_main_method_skips_when_selected() {
    let session = MockCommandSession::new();
    let mut metadata = resolved_metadata();
    metadata.selected_main_method = Some("com.example.App".to_string());

    let next = StepExecutor::ResolveMainMethod
        .execute(&mut metadata, &session)
        .await
        .unwrap();

    assert_eq!(next, ExportStep::GenerateJar);
    assert!(session.build_support_provider.get_calls().is_empty());
}

#[tokio::test]
async fn test_resolve_main_method_without_candidates() {
    let session = MockCommandSession::new();
    let mut metadata = resolved_metadata();

    let next = StepExecutor::ResolveMainMethod
        .execute(&mut metadata, &session)
        .await
        .unwrap();

    assert_eq!(next, ExportStep::GenerateJar);
    assert_eq!(metadata.selected_main_method.as_deref(), Some(""));
    assert_eq!(metadata.main_class(), None);
    assert!(session.interactive_provider.get_fuzzy_select_calls().is_empty());
}

#[tokio::test]
async fn test_resolve_main_method_selects_candidate() {
    let session = MockCommandSession::new()
        .with_build_support(
            MockBuildSupportProvider::new()
                .with_main_classes(vec![main_class("com.example.A"), main_class("com.example.B")]),
        )
        .with_interactive(MockInteractiveProvider::new().with_fuzzy_select(Some(1)));
    let mut metadata = resolved_metadata();

    let next = StepExecutor::ResolveMainMethod
        .execute(&mut metadata, &session)
        .await
        .unwrap();

    assert_eq!(next, ExportStep::GenerateJar);
    assert_eq!(metadata.main_class(), Some("com.example.B"));

    let calls = session.interactive_provider.get_fuzzy_select_calls();
    assert_eq!(
        calls[0].1,
        vec!["com.example.A", "com.example.B", WITHOUT_MAIN_CLASS_OPTION]
    );
}

#[tokio::test]
async fn test_resolve_main_method_without_main_option() {
    let session = MockCommandSession::new()
        .with_build_support(MockBuildSupportProvider::new().with_main_classes(vec![main_class("App")]))
        .with_interactive(MockInteractiveProvider::new().with_fuzzy_select(Some(1)));
    let mut metadata = resolved_metadata();

    StepExecutor::ResolveMainMethod
        .execute(&mut metadata, &session)
        .await
        .unwrap();

    assert_eq!(metadata.selected_main_method.as_deref(), Some(""));
}

#[tokio::test]
async fn test_resolve_main_method_back_to_project() {
    let session = MockCommandSession::new()
        .with_build_support(MockBuildSupportProvider::new().with_main_classes(vec![main_class("App")]))
        .with_interactive(MockInteractiveProvider::new().with_fuzzy_select(Some(0)));
    let mut metadata = resolved_metadata();
    metadata.steps.push(ExportStep::ResolveProject);

    let next = StepExecutor::ResolveMainMethod
        .execute(&mut metadata, &session)
        .await
        .unwrap();

    assert_eq!(next, ExportStep::ResolveProject);
    assert!(metadata.back_to_project_step);
    assert!(metadata.steps.is_empty());
    assert!(metadata.selected_main_method.is_none());

    let calls = session.interactive_provider.get_fuzzy_select_calls();
    assert_eq!(calls[0].1[0], BACK_OPTION);
}

#[tokio::test]
async fn test_resolve_main_method_escape_cancels() {
    let session = MockCommandSession::new()
        .with_build_support(MockBuildSupportProvider::new().with_main_classes(vec![main_class("App")]))
        .with_interactive(MockInteractiveProvider::new().with_fuzzy_select(None));
    let mut metadata = resolved_metadata();

    let result = StepExecutor::ResolveMainMethod
        .execute(&mut metadata, &session)
        .await;

    assert!(matches!(result, Err(ExportError::Cancelled)));
    assert!(metadata.selected_main_method.is_none());
}

#[tokio::test]
async fn test_generate_jar_writes_archive() {
    let session = MockCommandSession::new();
    let mut metadata = resolved_metadata();
    metadata.selected_main_method = Some("com.example.App".to_string());
    metadata.sources = vec![ClasspathEntry {
        source: "/workspace/demo/app/out/App.class".to_string(),
        destination: "App.class".to_string(),
    }];
    metadata.dependencies = vec!["/workspace/demo/lib/dep.jar".to_string()];

    let next = StepExecutor::GenerateJar
        .execute(&mut metadata, &session)
        .await
        .unwrap();

    assert_eq!(next, ExportStep::Finish);
    let expected = PathBuf::from("/workspace/demo/demo.jar");
    assert_eq!(metadata.output_path, Some(OutputTarget::Path(expected.clone())));

    let requests = session.archive_provider.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].output_path, expected);
    assert_eq!(requests[0].main_class.as_deref(), Some("com.example.App"));
    assert_eq!(requests[0].sources.len(), 1);
    assert!(session.display_provider.count_calls("progress_bar") > 0);
    assert!(session.display_provider.count_calls("progress_finish") > 0);
}

#[tokio::test]
async fn test_generate_jar_asks_for_output() {
    let session = MockCommandSession::new()
        .with_config(config_with(&["/workspace/demo"], SETTING_ASK_USER))
        .with_interactive(MockInteractiveProvider::new().with_text_input("dist"));
    let mut metadata = resolved_metadata();
    metadata.selected_main_method = Some(String::new());

    StepExecutor::GenerateJar
        .execute(&mut metadata, &session)
        .await
        .unwrap();

    let requests = session.archive_provider.get_requests();
    assert_eq!(requests[0].output_path, PathBuf::from("/workspace/demo/dist/demo.jar"));
    assert_eq!(requests[0].main_class, None);
    let prompts = session.interactive_provider.get_text_input_calls();
    assert_eq!(prompts[0].1, "/workspace/demo/demo.jar");
}

#[tokio::test]
async fn test_generate_jar_empty_answer_cancels() {
    let session = MockCommandSession::new()
        .with_config(config_with(&["/workspace/demo"], SETTING_ASK_USER))
        .with_interactive(MockInteractiveProvider::new().with_text_input("  "));
    let mut metadata = resolved_metadata();

    let result = StepExecutor::GenerateJar.execute(&mut metadata, &session).await;

    assert!(matches!(result, Err(ExportError::Cancelled)));
    assert!(session.archive_provider.get_requests().is_empty());
}

#[tokio::test]
async fn test_generate_jar_archive_failure() {
    let session = MockCommandSession::new()
        .with_archive(MockArchiveProvider::new().with_failure("disk full"));
    let mut metadata = resolved_metadata();

    let result = StepExecutor::GenerateJar.execute(&mut metadata, &session).await;

    match result {
        Err(ExportError::ArchiveWrite { message }) => assert!(message.contains("disk full")),
        other => panic!("expected ArchiveWrite, got {:?}", other),
    }
    assert!(session.display_provider.count_calls("progress_abandon") > 0);
    assert!(metadata.output_path.is_none());
}

#[test]
fn test_folder_for_entry_prefers_deepest_folder() {
    let folders = vec![
        WorkspaceFolder::from_path("/ws"),
        WorkspaceFolder::from_path("/ws/nested"),
    ];

    assert_eq!(
        folder_for_entry(Path::new("/ws/nested/app"), &folders).path,
        PathBuf::from("/ws/nested")
    );
    assert_eq!(
        folder_for_entry(Path::new("/ws/other"), &folders).path,
        PathBuf::from("/ws")
    );
    assert_eq!(
        folder_for_entry(Path::new("/elsewhere/app"), &folders).name,
        "app"
    );
}
