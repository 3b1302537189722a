//! E2E tests for saving, listing, replaying and migrating export tasks

use anyhow::Result;
use jarpack_lib::application::cli::{Commands, TaskAction};
use jarpack_lib::application::commands::execute_command_with_controller;
use jarpack_lib::application::session_mocks::MockInteractiveProvider;
use jarpack_lib::export::{ExportTaskDefinition, PipelineController, TaskStore};
use jarpack_tests::{TestWorkspace, jar_entries};

fn workspace_with_app() -> Result<TestWorkspace> {
    let workspace = TestWorkspace::new()?;
    workspace
        .maven_project("")?
        .class_file("", "com/example/App.class")?
        .main_source("", "com.example.App")?;
    Ok(workspace)
}

#[tokio::test]
async fn e2e_save_then_replay_task() -> Result<()> {
    let workspace = workspace_with_app()?;
    let session = workspace.session(
        workspace.app_config(),
        MockInteractiveProvider::new().with_yes_mode(true),
    );
    let controller = PipelineController::new();

    let command = Commands::Export {
        path: None,
        main_class: None,
        output: Some("out/app.jar".to_string()),
        manifest: None,
        elements: vec!["${compile-output}".to_string()],
        save_as: Some("release".to_string()),
    };
    execute_command_with_controller(command, &session, &controller).await?;

    let saved = TaskStore::for_folder(&workspace.root)
        .get("release")?
        .expect("task saved");
    assert_eq!(saved.main_class.as_deref(), Some("com.example.App"));

    let jar = workspace.root.join("out/app.jar");
    std::fs::remove_file(&jar)?;

    let replay = Commands::Run {
        name: "release".to_string(),
        path: None,
    };
    execute_command_with_controller(replay, &session, &controller).await?;

    assert!(jar_entries(&jar)?.contains(&"com/example/App.class".to_string()));
    Ok(())
}

#[tokio::test]
async fn e2e_migrate_then_run_legacy_task() -> Result<()> {
    let workspace = workspace_with_app()?;
    let store = TaskStore::for_folder(&workspace.root);
    store.save(ExportTaskDefinition {
        name: "legacy".to_string(),
        elements: vec!["compile-output".to_string()],
        main_class: Some(String::new()),
        target_path: None,
        manifest_path: None,
    })?;

    let session = workspace.session(
        workspace.app_config(),
        MockInteractiveProvider::new().with_yes_mode(true),
    );
    let controller = PipelineController::new();
    let run = || Commands::Run {
        name: "legacy".to_string(),
        path: None,
    };

    assert!(
        execute_command_with_controller(run(), &session, &controller)
            .await
            .is_err()
    );

    let migrate = Commands::Tasks {
        json: false,
        action: Some(TaskAction::Migrate),
    };
    execute_command_with_controller(migrate, &session, &controller).await?;
    assert_eq!(store.get("legacy")?.expect("task kept").elements, vec!["${compile-output}"]);

    execute_command_with_controller(run(), &session, &controller).await?;
    assert!(jar_entries(&workspace.default_jar())?.contains(&"com/example/App.class".to_string()));
    Ok(())
}

#[tokio::test]
async fn e2e_tasks_listing_includes_default() -> Result<()> {
    let workspace = workspace_with_app()?;
    let session = workspace.session(
        workspace.app_config(),
        MockInteractiveProvider::new().with_yes_mode(true),
    );

    let list = Commands::Tasks {
        json: true,
        action: None,
    };
    execute_command_with_controller(list, &session, &PipelineController::new()).await?;

    // Listing never writes a task file
    assert!(!TaskStore::for_folder(&workspace.root).path().exists());
    Ok(())
}
