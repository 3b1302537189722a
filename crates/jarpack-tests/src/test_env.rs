//! Hermetic workspace for end-to-end export tests
//!
//! Builds a small Java workspace on disk (build files, compiled output,
//! sources and dependency jars) inside a temporary directory, and wires a
//! session over it with the live build-support and archive collaborators.

use anyhow::{Context, Result};
use jarpack_lib::application::config::AppConfig;
use jarpack_lib::application::session::{CommandSession, LiveConfigProvider};
use jarpack_lib::application::session_mocks::MockInteractiveProvider;
use jarpack_lib::export::{WorkspaceBuildSupport, ZipArchiveWriter};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Session type used by end-to-end tests
pub type TestSession =
    CommandSession<WorkspaceBuildSupport, ZipArchiveWriter, LiveConfigProvider, MockInteractiveProvider>;

/// Temporary Java workspace
pub struct TestWorkspace {
    /// Keeps the directory alive for the test's duration
    pub temp_dir: TempDir,
    /// Workspace folder (`<temp>/demo`)
    pub root: PathBuf,
}

impl TestWorkspace {
    /// Empty workspace folder named `demo`
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("demo");
        fs::create_dir_all(&root)?;
        Ok(Self { temp_dir, root })
    }

    /// Mark `project` (relative to the root, "" for the root itself) as a Maven project
    pub fn maven_project(&self, project: &str) -> Result<&Self> {
        let dir = self.project_dir(project);
        fs::create_dir_all(dir.join("target/classes"))?;
        fs::write(dir.join("pom.xml"), "<project/>\n")?;
        Ok(self)
    }

    /// Write a compiled class file under the project's `target/classes`
    pub fn class_file(&self, project: &str, relative: &str) -> Result<&Self> {
        let path = self.project_dir(project).join("target/classes").join(relative);
        write_file(&path, b"\xCA\xFE\xBA\xBE")?;
        Ok(self)
    }

    /// Write a test class file under the project's `target/test-classes`
    pub fn test_class_file(&self, project: &str, relative: &str) -> Result<&Self> {
        let path = self
            .project_dir(project)
            .join("target/test-classes")
            .join(relative);
        write_file(&path, b"\xCA\xFE\xBA\xBE")?;
        Ok(self)
    }

    /// Write a Java source declaring `public static void main`
    pub fn main_source(&self, project: &str, class_name: &str) -> Result<&Self> {
        let (package, simple) = match class_name.rsplit_once('.') {
            Some((package, simple)) => (Some(package), simple),
            None => (None, class_name),
        };
        let mut relative = PathBuf::from("src/main/java");
        if let Some(package) = package {
            relative.push(package.replace('.', "/"));
        }
        relative.push(format!("{}.java", simple));

        let mut source = String::new();
        if let Some(package) = package {
            source.push_str(&format!("package {};\n\n", package));
        }
        source.push_str(&format!(
            "public class {} {{\n    public static void main(String[] args) {{\n    }}\n}}\n",
            simple
        ));
        write_file(&self.project_dir(project).join(relative), source.as_bytes())?;
        Ok(self)
    }

    /// Write a dependency jar under the project's `lib/` holding `entries`
    pub fn dependency_jar(&self, project: &str, name: &str, entries: &[(&str, &str)]) -> Result<PathBuf> {
        let path = self.project_dir(project).join("lib").join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(&path)?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (entry, content) in entries {
            writer.start_file(*entry, options)?;
            writer.write_all(content.as_bytes())?;
        }
        writer.finish()?;
        Ok(path)
    }

    pub fn project_dir(&self, project: &str) -> PathBuf {
        if project.is_empty() {
            self.root.clone()
        } else {
            self.root.join(project)
        }
    }

    /// Non-interactive configuration over this workspace
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            workdir: Some(self.root.clone()),
            folders: vec![self.root.clone()],
            yes: true,
            ..AppConfig::default()
        }
    }

    /// Session with live build support and archive writer
    pub fn session(&self, config: AppConfig, interactive: MockInteractiveProvider) -> TestSession {
        CommandSession::new_with_providers(
            WorkspaceBuildSupport::new(config.folders.clone()),
            ZipArchiveWriter::new(),
            LiveConfigProvider::new(config),
            interactive,
        )
    }

    /// Where the default target puts the jar
    pub fn default_jar(&self) -> PathBuf {
        self.root.join("demo.jar")
    }
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Entry names of a jar, in archive order
pub fn jar_entries(jar: &Path) -> Result<Vec<String>> {
    let mut archive = ZipArchive::new(fs::File::open(jar)?)?;
    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        names.push(archive.by_index(index)?.name().to_string());
    }
    Ok(names)
}

/// Text content of one jar entry
pub fn read_jar_entry(jar: &Path, name: &str) -> Result<String> {
    let mut archive = ZipArchive::new(fs::File::open(jar)?)?;
    let mut entry = archive.by_name(name)?;
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}
