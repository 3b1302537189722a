use super::*;

#[test]
fn test_export_command_parses_elements() {
    let cli = Cli::try_parse_from([
        "jarpack",
        "--yes",
        "export",
        "app",
        "--main-class",
        "com.example.App",
        "-e",
        "${compile-output}",
        "-e",
        "!**/*Test.class",
        "--save-as",
        "release",
    ])
    .unwrap();

    assert!(cli.config.yes);
    match cli.command {
        Some(Commands::Export {
            path,
            main_class,
            elements,
            save_as,
            ..
        }) => {
            assert_eq!(path, Some(PathBuf::from("app")));
            assert_eq!(main_class.as_deref(), Some("com.example.App"));
            assert_eq!(elements, vec!["${compile-output}", "!**/*Test.class"]);
            assert_eq!(save_as.as_deref(), Some("release"));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_tasks_migrate_subcommand() {
    let cli = Cli::try_parse_from(["jarpack", "tasks", "migrate"]).unwrap();
    match cli.command {
        Some(Commands::Tasks { json, action }) => {
            assert!(!json);
            assert_eq!(action, Some(TaskAction::Migrate));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_command_exports() {
    let run = Cli::try_parse_from(["jarpack", "run", "release"]).unwrap();
    assert!(run.command.unwrap().exports());
    assert!(!Commands::Version.exports());
}
