//! Drives the jarpack binary end to end

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn jarpack(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jarpack").expect("jarpack binary");
    cmd.current_dir(workdir)
        .env_remove("JARPACK_FOLDERS")
        .env_remove("JARPACK_TARGET_FOLDER")
        .env("NO_COLOR", "1");
    cmd
}

fn maven_workspace() -> TempDir {
    let temp = TempDir::new().expect("temp dir");
    let root = temp.path().join("demo");
    fs::create_dir_all(root.join("target/classes/com/example")).expect("classes dir");
    fs::write(root.join("pom.xml"), "<project/>\n").expect("pom");
    fs::write(root.join("target/classes/com/example/App.class"), b"\xCA\xFE\xBA\xBE")
        .expect("class file");
    temp
}

#[test]
fn version_prints_package_version() {
    let temp = TempDir::new().expect("temp dir");
    jarpack(temp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn export_writes_jar_non_interactively() {
    let temp = maven_workspace();
    let root = temp.path().join("demo");

    jarpack(&root)
        .args(["--yes", "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully exported jar to"));

    assert!(root.join("demo.jar").is_file());
}

#[test]
fn export_to_explicit_output() {
    let temp = maven_workspace();
    let root = temp.path().join("demo");

    jarpack(temp.path())
        .arg("--workdir")
        .arg(&root)
        .args(["--yes", "export", "--output", "build/app.jar", "--main-class", "com.example.App"])
        .assert()
        .success();

    assert!(root.join("build/app.jar").is_file());
}

#[test]
fn tasks_json_lists_default_task() {
    let temp = maven_workspace();
    let root = temp.path().join("demo");

    jarpack(&root)
        .args(["tasks", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source\": \"default\""))
        .stdout(predicate::str::contains("${compile-output}"));
}

#[test]
fn export_without_projects_fails() {
    let temp = TempDir::new().expect("temp dir");

    jarpack(temp.path())
        .args(["--yes", "export"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No java project found"));
}

#[test]
fn invalid_workdir_is_rejected() {
    let temp = TempDir::new().expect("temp dir");

    jarpack(temp.path())
        .args(["--workdir", "missing-dir", "version"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid working directory"));
}
