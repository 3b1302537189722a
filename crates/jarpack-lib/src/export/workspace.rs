//! Convention-based build-support collaborator
//!
//! Answers the pipeline's project, classpath and main-class queries from the
//! filesystem alone. Nothing is compiled here: compiled output must already
//! exist (`mvn compile`, `gradle classes`, an IDE build, ...).

use crate::application::session::{BuildSupportProvider, ProviderFuture};
use crate::export::glob::normalize_path;
use crate::export::{ClasspathResult, MainClassInfo, ProjectInfo, WorkspaceFolder};
use crate::primitives::ClasspathScope;
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const BUILD_FILES: &[&str] = &["pom.xml", "build.gradle", "build.gradle.kts"];

/// Compiled output directories, relative to a project
const RUNTIME_OUTPUTS: &[&str] = &[
    "target/classes",
    "build/classes/java/main",
    "build/classes/kotlin/main",
    "build/resources/main",
    "bin",
];

const TEST_OUTPUTS: &[&str] = &[
    "target/test-classes",
    "build/classes/java/test",
    "build/classes/kotlin/test",
    "build/resources/test",
];

/// Directories whose `*.jar` files are runtime dependencies
const LIBRARY_DIRS: &[&str] = &["lib", "target/dependency"];

const MAIN_SIGNATURES: &[&str] = &["static void main(", "static void main ("];

/// Live build-support provider over plain directories
#[derive(Debug, Clone)]
pub struct WorkspaceBuildSupport {
    folders: Vec<PathBuf>,
}

fn is_project(dir: &Path) -> bool {
    BUILD_FILES.iter().any(|file| dir.join(file).is_file()) || dir.join("src").is_dir()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

/// The folder itself when it is a project, then its direct project sub-folders by name
pub fn discover_projects(folder: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut projects = Vec::new();
    let mut names = HashSet::new();

    if is_project(folder) {
        let name = WorkspaceFolder::from_path(folder).name;
        names.insert(name.clone());
        projects.push((name, folder.to_path_buf()));
    }

    let mut children: Vec<PathBuf> = fs::read_dir(folder)
        .with_context(|| format!("Failed to read workspace folder {}", folder.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir() && !is_hidden(path))
        .collect();
    children.sort();

    for child in children {
        if !is_project(&child) {
            continue;
        }
        let name = WorkspaceFolder::from_path(&child).name;
        if names.insert(name.clone()) {
            projects.push((name, child));
        } else {
            tracing::warn!(project = %name, "Duplicate project name; keeping the first");
        }
    }

    Ok(projects)
}

fn existing_dirs(project: &Path, relative: &[&str]) -> Vec<String> {
    relative
        .iter()
        .map(|dir| project.join(dir))
        .filter(|dir| dir.is_dir())
        .map(|dir| normalize_path(&dir.to_string_lossy()))
        .collect()
}

fn library_jars(project: &Path) -> Result<Vec<String>> {
    let mut jars = Vec::new();
    for dir in LIBRARY_DIRS.iter().map(|dir| project.join(dir)) {
        if !dir.is_dir() {
            continue;
        }
        let mut found: Vec<PathBuf> = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read library directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file() && path.extension().is_some_and(|ext| ext == "jar")
            })
            .collect();
        found.sort();
        jars.extend(found.iter().map(|jar| normalize_path(&jar.to_string_lossy())));
    }
    Ok(jars)
}

/// Classpath of one project directory
pub fn project_classpath(project: &Path, scope: ClasspathScope) -> Result<ClasspathResult> {
    let mut classpaths = Vec::new();
    if scope == ClasspathScope::Test {
        classpaths.extend(existing_dirs(project, TEST_OUTPUTS));
    }
    classpaths.extend(existing_dirs(project, RUNTIME_OUTPUTS));
    classpaths.extend(library_jars(project)?);
    Ok(ClasspathResult {
        classpaths,
        modulepaths: Vec::new(),
    })
}

/// Fully qualified name of the class declared in `source`, when it has a `main`
pub fn main_class_of(path: &Path, source: &str) -> Option<String> {
    let flattened = source.split_whitespace().collect::<Vec<_>>().join(" ");
    if !MAIN_SIGNATURES.iter().any(|sig| flattened.contains(sig)) {
        return None;
    }
    let class = path.file_stem()?.to_string_lossy().to_string();
    let package = source
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("package "))
        .map(|rest| rest.trim_end_matches(';').trim().to_string())
        .filter(|package| !package.is_empty());
    Some(match package {
        Some(package) => format!("{}.{}", package, class),
        None => class,
    })
}

/// Scan Java sources below `root` for main classes, sorted by name
pub fn scan_main_classes(root: &Path) -> Vec<MainClassInfo> {
    let mut classes: Vec<MainClassInfo> = WalkBuilder::new(root)
        .hidden(true)
        .require_git(false)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "java"))
        .filter_map(|entry| {
            let source = match fs::read_to_string(entry.path()) {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Skipping unreadable source");
                    return None;
                }
            };
            main_class_of(entry.path(), &source).map(|name| MainClassInfo {
                name,
                path: entry.path().to_path_buf(),
            })
        })
        .collect();
    classes.sort_by(|a, b| a.name.cmp(&b.name));
    classes.dedup_by(|a, b| a.name == b.name);
    classes
}

impl WorkspaceBuildSupport {
    pub fn new(folders: Vec<PathBuf>) -> Self {
        Self { folders }
    }

    fn project_dir(project: &ProjectInfo) -> Result<PathBuf> {
        project
            .path()
            .with_context(|| format!("Project '{}' is not on the local filesystem", project.name))
    }
}

impl BuildSupportProvider for WorkspaceBuildSupport {
    fn is_server_ready(&self) -> ProviderFuture<'_, bool> {
        Box::pin(async move {
            let missing: Vec<&PathBuf> = self.folders.iter().filter(|f| !f.is_dir()).collect();
            for folder in &missing {
                tracing::warn!(folder = %folder.display(), "Workspace folder does not exist");
            }
            Ok(missing.is_empty())
        })
    }

    fn build_workspace(&self) -> ProviderFuture<'_, bool> {
        Box::pin(async move {
            let mut ready = true;
            for folder in &self.folders {
                for (name, dir) in discover_projects(folder)? {
                    if existing_dirs(&dir, RUNTIME_OUTPUTS).is_empty() {
                        tracing::warn!(
                            project = %name,
                            "No compiled output found; build the project before exporting"
                        );
                        ready = false;
                    }
                }
            }
            Ok(ready)
        })
    }

    fn get_projects<'a>(&'a self, folder: &'a WorkspaceFolder) -> ProviderFuture<'a, Vec<ProjectInfo>> {
        Box::pin(async move {
            let mut projects = Vec::new();
            for (name, dir) in discover_projects(&folder.path)? {
                projects.push(ProjectInfo::from_path(&name, &dir)?);
            }
            tracing::debug!(folder = %folder.name, count = projects.len(), "Discovered projects");
            Ok(projects)
        })
    }

    fn get_classpaths<'a>(
        &'a self,
        project: &'a ProjectInfo,
        scope: ClasspathScope,
    ) -> ProviderFuture<'a, ClasspathResult> {
        Box::pin(async move {
            let dir = Self::project_dir(project)?;
            project_classpath(&dir, scope)
        })
    }

    fn get_main_classes<'a>(
        &'a self,
        folder: &'a WorkspaceFolder,
    ) -> ProviderFuture<'a, Vec<MainClassInfo>> {
        let root = folder.path.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || scan_main_classes(&root))
                .await
                .context("Main class scan did not complete")
        })
    }
}

#[cfg(test)]
mod tests {
    include!("workspace.test.rs");
}
