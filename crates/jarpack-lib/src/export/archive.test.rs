use super::*;
use crate::display::MockDisplayProvider;
use crate::display::DisplayProvider;
use std::io::Read;
use tempfile::TempDir;

fn write_file(path: &Path, content: &str) -> String {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    path.to_string_lossy().replace('\\', "/")
}

fn write_dependency(path: &Path, entries: &[(&str, &str)]) -> String {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path.to_string_lossy().replace('\\', "/")
}

fn read_entry(jar: &Path, name: &str) -> Option<String> {
    let mut archive = ZipArchive::new(File::open(jar).unwrap()).unwrap();
    let mut entry = archive.by_name(name).ok()?;
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    Some(content)
}

fn entry_names(jar: &Path) -> Vec<String> {
    let mut archive = ZipArchive::new(File::open(jar).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

#[test]
fn test_default_manifest() {
    let manifest = default_manifest(Some("com.acme.Main"));
    assert!(manifest.starts_with("Manifest-Version: 1.0\r\n"));
    assert!(manifest.contains("Main-Class: com.acme.Main\r\n"));
    assert!(!default_manifest(Some("")).contains("Main-Class"));
    assert!(!default_manifest(None).contains("Main-Class"));
}

#[test]
fn test_excluded_dependency_entries() {
    assert!(is_excluded_dependency_entry("META-INF/MANIFEST.MF"));
    assert!(is_excluded_dependency_entry("META-INF/SIGNER.SF"));
    assert!(is_excluded_dependency_entry("meta-inf/signer.rsa"));
    assert!(!is_excluded_dependency_entry("META-INF/services/java.sql.Driver"));
    assert!(!is_excluded_dependency_entry("com/lib/Lib.class"));
}

#[test]
fn test_write_sources_and_dependencies() {
    let temp = TempDir::new().unwrap();
    let a = write_file(&temp.path().join("out/com/A.class"), "A");
    let dep = write_dependency(
        &temp.path().join("lib/lib.jar"),
        &[
            ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\r\n"),
            ("META-INF/LIB.SF", "sig"),
            ("com/lib/Lib.class", "Lib"),
            ("com/A.class", "shadowed"),
        ],
    );
    let output = temp.path().join("dist/app.jar");
    let request = ArchiveRequest {
        sources: vec![ClasspathEntry {
            source: a,
            destination: "com/A.class".to_string(),
        }],
        dependencies: vec![dep],
        main_class: Some("com.A".to_string()),
        manifest_path: None,
        output_path: output.clone(),
    };

    let display = MockDisplayProvider::new();
    let progress = display.progress().bar(request.total_work(), "Exporting");
    let produced = ZipArchiveWriter::new().write(&request, progress.as_ref()).unwrap();

    assert_eq!(produced, output);
    assert_eq!(
        entry_names(&output),
        vec!["META-INF/MANIFEST.MF", "com/A.class", "com/lib/Lib.class"]
    );
    assert_eq!(read_entry(&output, "com/A.class").as_deref(), Some("A"));
    assert!(read_entry(&output, MANIFEST_PATH).unwrap().contains("Main-Class: com.A"));
    assert_eq!(display.count_calls("progress_inc"), 2);
}

#[test]
fn test_custom_manifest_written_verbatim() {
    let temp = TempDir::new().unwrap();
    let manifest = temp.path().join("MANIFEST.MF");
    fs::write(&manifest, "Manifest-Version: 1.0\r\nMain-Class: custom.Entry\r\n\r\n").unwrap();
    let output = temp.path().join("app.jar");
    let request = ArchiveRequest {
        sources: Vec::new(),
        dependencies: Vec::new(),
        main_class: Some("ignored.Main".to_string()),
        manifest_path: Some(manifest),
        output_path: output.clone(),
    };

    let display = MockDisplayProvider::new();
    let progress = display.progress().bar(0, "Exporting");
    ZipArchiveWriter::new().write(&request, progress.as_ref()).unwrap();

    let written = read_entry(&output, MANIFEST_PATH).unwrap();
    assert!(written.contains("custom.Entry"));
    assert!(!written.contains("ignored.Main"));
}

#[test]
fn test_missing_source_fails() {
    let temp = TempDir::new().unwrap();
    let request = ArchiveRequest {
        sources: vec![ClasspathEntry {
            source: temp.path().join("missing.class").to_string_lossy().to_string(),
            destination: "missing.class".to_string(),
        }],
        dependencies: Vec::new(),
        main_class: None,
        manifest_path: None,
        output_path: temp.path().join("app.jar"),
    };

    let display = MockDisplayProvider::new();
    let progress = display.progress().bar(1, "Exporting");
    assert!(ZipArchiveWriter::new().write(&request, progress.as_ref()).is_err());
}

#[test]
fn test_failed_write_keeps_previous_jar() {
    let temp = TempDir::new().unwrap();
    let a = write_file(&temp.path().join("out/com/A.class"), "A");
    let bad = write_file(&temp.path().join("lib/bad.jar"), "not a zip");
    let output = temp.path().join("dist/app.jar");
    write_file(&output, "PREVIOUS GOOD JAR");
    let request = ArchiveRequest {
        sources: vec![ClasspathEntry {
            source: a,
            destination: "com/A.class".to_string(),
        }],
        dependencies: vec![bad],
        main_class: None,
        manifest_path: None,
        output_path: output.clone(),
    };

    let display = MockDisplayProvider::new();
    let progress = display.progress().bar(request.total_work(), "Exporting");
    assert!(ZipArchiveWriter::new().write(&request, progress.as_ref()).is_err());

    assert_eq!(fs::read_to_string(&output).unwrap(), "PREVIOUS GOOD JAR");
    let leftovers: Vec<_> = fs::read_dir(temp.path().join("dist"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("app.jar")]);
}

#[test]
fn test_successful_write_replaces_previous_jar() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("app.jar");
    write_file(&output, "OLD");
    let request = ArchiveRequest {
        sources: Vec::new(),
        dependencies: Vec::new(),
        main_class: Some("com.A".to_string()),
        manifest_path: None,
        output_path: output.clone(),
    };

    let display = MockDisplayProvider::new();
    let progress = display.progress().bar(0, "Exporting");
    ZipArchiveWriter::new().write(&request, progress.as_ref()).unwrap();

    assert_eq!(entry_names(&output), vec!["META-INF/MANIFEST.MF"]);
}

#[tokio::test]
async fn test_write_archive_relays_progress_from_blocking_writer() {
    let temp = TempDir::new().unwrap();
    let a = write_file(&temp.path().join("out/com/A.class"), "A");
    let b = write_file(&temp.path().join("out/com/B.class"), "B");
    let output = temp.path().join("app.jar");
    let request = ArchiveRequest {
        sources: vec![
            ClasspathEntry {
                source: a,
                destination: "com/A.class".to_string(),
            },
            ClasspathEntry {
                source: b,
                destination: "com/B.class".to_string(),
            },
        ],
        dependencies: Vec::new(),
        main_class: None,
        manifest_path: None,
        output_path: output.clone(),
    };

    let display = MockDisplayProvider::new();
    let progress = display.progress().bar(request.total_work(), "Exporting");
    let writer = ZipArchiveWriter::new();
    let produced = writer.write_archive(&request, progress.as_ref()).await.unwrap();

    assert_eq!(produced, output);
    assert_eq!(display.count_calls("progress_inc"), 2);
    assert_eq!(display.count_calls("progress_tick"), 2);
    assert_eq!(display.count_calls("progress_finish"), 0);
}
