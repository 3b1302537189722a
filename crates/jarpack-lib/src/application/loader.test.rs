use super::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_from_cli_validates_and_keeps_cli_values() {
    let temp = TempDir::new().unwrap();
    let cli = AppConfig {
        workdir: Some(temp.path().to_path_buf()),
        folders: vec![PathBuf::from("app")],
        log_level: 3,
        ..AppConfig::default()
    };

    let config = AppConfig::from_cli(cli).unwrap();

    assert_eq!(config.workdir.as_deref(), Some(temp.path()));
    assert_eq!(config.folders, vec![temp.path().join("app")]);
    assert_eq!(config.log_level, 3);
}

#[test]
fn test_from_cli_rejects_missing_workdir() {
    let cli = AppConfig {
        workdir: Some(PathBuf::from("/definitely/not/a/jarpack/workdir")),
        ..AppConfig::default()
    };

    assert!(AppConfig::from_cli(cli).is_err());
}

#[test]
fn test_global_config_initializes_once() {
    let temp = TempDir::new().unwrap();
    let config = AppConfig {
        workdir: Some(temp.path().to_path_buf()),
        ..AppConfig::default()
    };

    AppConfig::init_global(config.clone()).unwrap();
    assert!(AppConfig::global().is_some());
    assert!(matches!(
        AppConfig::init_global(config),
        Err(ConfigError::AlreadyInitialized)
    ));
}
