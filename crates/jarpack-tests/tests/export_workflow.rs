//! E2E tests for the export command
//!
//! These tests use real filesystems (tempfile), the live build-support and
//! archive collaborators, and a scripted interactive provider.

use anyhow::Result;
use jarpack_lib::application::cli::Commands;
use jarpack_lib::application::commands::execute_command_with_controller;
use jarpack_lib::application::session_mocks::MockInteractiveProvider;
use jarpack_lib::export::PipelineController;
use jarpack_tests::{TestWorkspace, jar_entries, read_jar_entry};

fn export(elements: &[&str]) -> Commands {
    Commands::Export {
        path: None,
        main_class: None,
        output: None,
        manifest: None,
        elements: elements.iter().map(|e| e.to_string()).collect(),
        save_as: None,
    }
}

#[tokio::test]
async fn e2e_export_single_project() -> Result<()> {
    let workspace = TestWorkspace::new()?;
    workspace
        .maven_project("")?
        .class_file("", "com/example/App.class")?
        .class_file("", "com/example/util/Helper.class")?
        .test_class_file("", "com/example/AppTest.class")?
        .main_source("", "com.example.App")?;
    workspace.dependency_jar(
        "",
        "dep.jar",
        &[
            ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\r\n"),
            ("org/dep/Dep.class", "dep"),
        ],
    )?;

    let session = workspace.session(
        workspace.app_config(),
        MockInteractiveProvider::new().with_yes_mode(true),
    );
    execute_command_with_controller(export(&[]), &session, &PipelineController::new()).await?;

    let jar = workspace.default_jar();
    let entries = jar_entries(&jar)?;
    assert_eq!(entries[0], "META-INF/MANIFEST.MF");
    assert!(entries.contains(&"com/example/App.class".to_string()));
    assert!(entries.contains(&"com/example/util/Helper.class".to_string()));
    assert!(entries.contains(&"org/dep/Dep.class".to_string()));
    assert!(!entries.iter().any(|entry| entry.contains("AppTest")));
    assert_eq!(
        entries.iter().filter(|e| e.as_str() == "META-INF/MANIFEST.MF").count(),
        1
    );

    let manifest = read_jar_entry(&jar, "META-INF/MANIFEST.MF")?;
    assert!(manifest.contains("Main-Class: com.example.App"));
    Ok(())
}

#[tokio::test]
async fn e2e_export_selected_module_with_negation() -> Result<()> {
    let workspace = TestWorkspace::new()?;
    workspace
        .maven_project("core")?
        .class_file("core", "com/acme/Api.class")?
        .class_file("core", "com/acme/internal/Impl.class")?
        .maven_project("cli")?
        .class_file("cli", "com/acme/cli/Main.class")?;

    let session = workspace.session(
        workspace.app_config(),
        MockInteractiveProvider::new().with_yes_mode(true),
    );
    let command = Commands::Export {
        path: None,
        main_class: Some(String::new()),
        output: Some("dist".to_string()),
        manifest: None,
        elements: vec![
            "${compile-output:core}".to_string(),
            "!${compile-output:core}/com/acme/internal/**".to_string(),
        ],
        save_as: None,
    };
    execute_command_with_controller(command, &session, &PipelineController::new()).await?;

    let jar = workspace.root.join("dist/demo.jar");
    let mut entries = jar_entries(&jar)?;
    entries.sort();
    assert_eq!(entries, vec!["META-INF/MANIFEST.MF", "com/acme/Api.class"]);

    let manifest = read_jar_entry(&jar, "META-INF/MANIFEST.MF")?;
    assert!(!manifest.contains("Main-Class"));
    Ok(())
}

#[tokio::test]
async fn e2e_export_interactive_main_class_choice() -> Result<()> {
    let workspace = TestWorkspace::new()?;
    workspace
        .maven_project("")?
        .class_file("", "App.class")?
        .main_source("", "com.example.App")?
        .main_source("", "com.example.Tool")?;

    let mut config = workspace.app_config();
    config.yes = false;
    // Options: com.example.App, com.example.Tool, <without main class>
    let session = workspace.session(
        config,
        MockInteractiveProvider::new().with_fuzzy_select(Some(1)),
    );
    execute_command_with_controller(export(&[]), &session, &PipelineController::new()).await?;

    let manifest = read_jar_entry(&workspace.default_jar(), "META-INF/MANIFEST.MF")?;
    assert!(manifest.contains("Main-Class: com.example.Tool"));
    Ok(())
}

#[tokio::test]
async fn e2e_export_without_compiled_output_aborts() -> Result<()> {
    let workspace = TestWorkspace::new()?;
    std::fs::write(workspace.root.join("pom.xml"), "<project/>\n")?;

    let session = workspace.session(
        workspace.app_config(),
        MockInteractiveProvider::new().with_yes_mode(true),
    );
    let result =
        execute_command_with_controller(export(&[]), &session, &PipelineController::new()).await;

    assert!(result.is_err());
    assert!(!workspace.default_jar().exists());
    Ok(())
}

#[tokio::test]
async fn e2e_export_rejects_bare_tokens() -> Result<()> {
    let workspace = TestWorkspace::new()?;
    workspace
        .maven_project("")?
        .class_file("", "App.class")?;

    let session = workspace.session(
        workspace.app_config(),
        MockInteractiveProvider::new().with_yes_mode(true),
    );
    let result = execute_command_with_controller(
        export(&["compile-output"]),
        &session,
        &PipelineController::new(),
    )
    .await;

    let error = result.unwrap_err();
    assert!(format!("{:#}", error).contains("compile-output"));
    assert!(!workspace.default_jar().exists());
    Ok(())
}
