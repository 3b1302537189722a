use super::*;
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.log_level, 1);
    assert_eq!(config.target_folder, "${workspaceFolder}");
    assert_eq!(config.color, ColorIntent::Auto);
    assert!(config.folders.is_empty());
    assert!(!config.yes);
}

#[test]
fn test_config_merging() {
    let base = AppConfig {
        folders: vec![PathBuf::from("/ws/base")],
        ..AppConfig::default()
    };
    let override_config = AppConfig {
        log_level: 3,
        color: ColorIntent::Never,
        target_folder: "dist".to_string(),
        yes: true,
        ..AppConfig::default()
    };

    let merged = base.merge_with(override_config);
    assert_eq!(merged.log_level, 3);
    assert_eq!(merged.color, ColorIntent::Never);
    assert_eq!(merged.target_folder, "dist");
    assert!(merged.yes);
    assert_eq!(merged.folders, vec![PathBuf::from("/ws/base")]);
}

#[test]
fn test_validate_defaults_folders_to_workdir() {
    let temp = TempDir::new().unwrap();
    let mut config = AppConfig {
        workdir: Some(temp.path().to_path_buf()),
        ..AppConfig::default()
    };

    config.validate().unwrap();
    assert_eq!(config.folders, vec![temp.path().to_path_buf()]);
}

#[test]
fn test_validate_anchors_relative_folders() {
    let temp = TempDir::new().unwrap();
    let mut config = AppConfig {
        workdir: Some(temp.path().to_path_buf()),
        folders: vec![PathBuf::from("core"), PathBuf::from("/abs/tools")],
        ..AppConfig::default()
    };

    config.validate().unwrap();
    assert_eq!(
        config.folders,
        vec![temp.path().join("core"), PathBuf::from("/abs/tools")]
    );
}

#[test]
fn test_validate_rejects_missing_workdir() {
    let temp = TempDir::new().unwrap();
    let mut config = AppConfig {
        workdir: Some(temp.path().join("missing")),
        ..AppConfig::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWorkDir { .. })
    ));
}

#[test]
fn test_logger_config_follows_color_intent() {
    let config = AppConfig {
        log_level: 2,
        color: ColorIntent::Never,
        ..AppConfig::default()
    };

    let logger = config.to_logger_config();
    assert_eq!(logger.level, LogLevel::Info);
    assert!(!logger.color);
}

#[test]
fn test_cli_flags_parse_into_config() {
    let config = AppConfig::try_parse_from([
        "jarpack",
        "--folder",
        "/ws/a,/ws/b",
        "--target-folder",
        "Browse...",
        "--yes",
    ])
    .unwrap();

    assert_eq!(
        config.folders,
        vec![PathBuf::from("/ws/a"), PathBuf::from("/ws/b")]
    );
    assert_eq!(config.target_folder, "Browse...");
    assert!(config.yes);
}
