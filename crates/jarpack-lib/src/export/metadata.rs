//! Context threaded through one export attempt

use crate::export::{ExportError, SETTING_ASK_USER};
use crate::primitives::ExportStep;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Root under which relative classpath entries resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFolder {
    pub name: String,
    pub path: PathBuf,
}

impl WorkspaceFolder {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }

    pub fn uri(&self) -> Result<Url, ExportError> {
        directory_uri(&self.path)
    }
}

/// A discovered sub-project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub uri: Url,
}

impl ProjectInfo {
    pub fn from_path(name: &str, path: &Path) -> Result<Self, ExportError> {
        Ok(Self {
            name: name.to_string(),
            uri: directory_uri(path)?,
        })
    }

    /// Filesystem location, when the URI is a `file://` URI
    pub fn path(&self) -> Option<PathBuf> {
        self.uri.to_file_path().ok()
    }
}

fn directory_uri(path: &Path) -> Result<Url, ExportError> {
    Url::from_directory_path(path).map_err(|_| ExportError::Resolution {
        message: format!("'{}' is not an absolute directory path", path.display()),
        handler: None,
    })
}

/// One file placed in the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathEntry {
    /// Absolute, normalized source path
    pub source: String,
    /// Relative path inside the archive
    pub destination: String,
}

/// A class declaring `public static void main`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainClassInfo {
    /// Fully qualified class name
    pub name: String,
    /// Source file the declaration was found in
    pub path: PathBuf,
}

/// Where the jar goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Path(PathBuf),
    AskUser,
}

impl OutputTarget {
    /// Resolve a configured target: substitutes `${workspaceFolder}` and
    /// `${workspaceFolderBasename}`, anchors relative paths at the folder, and
    /// treats anything not ending in `.jar` as a directory.
    pub fn resolve(raw: &str, folder: &WorkspaceFolder) -> Self {
        let raw = raw.trim();
        if raw == SETTING_ASK_USER {
            return OutputTarget::AskUser;
        }
        let substituted = raw
            .replace(
                "${workspaceFolder}",
                &folder.path.to_string_lossy().replace('\\', "/"),
            )
            .replace("${workspaceFolderBasename}", &folder.name);
        let mut path = PathBuf::from(substituted);
        if path.is_relative() {
            path = folder.path.join(path);
        }
        let is_jar = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"));
        if !is_jar {
            path = path.join(format!("{}.jar", folder.name));
        }
        OutputTarget::Path(path)
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            OutputTarget::Path(path) => Some(path),
            OutputTarget::AskUser => None,
        }
    }
}

/// Mutable context owned by the pipeline for one export attempt
#[derive(Debug, Clone, Default)]
pub struct StepMetadata {
    /// Folder the caller started the export from
    pub entry: Option<PathBuf>,
    pub workspace_folder: Option<WorkspaceFolder>,
    pub project_list: Vec<ProjectInfo>,
    /// `Some("")` records an explicit "no main class"
    pub selected_main_method: Option<String>,
    pub elements: Vec<String>,
    pub dependencies: Vec<String>,
    pub sources: Vec<ClasspathEntry>,
    pub output_path: Option<OutputTarget>,
    pub manifest_path: Option<PathBuf>,
    /// Steps that prompted the user, most recent last
    pub steps: Vec<ExportStep>,
    pub back_to_project_step: bool,
}

impl StepMetadata {
    pub fn new(entry: Option<PathBuf>) -> Self {
        Self {
            entry,
            ..Self::default()
        }
    }

    pub fn workspace_folder(&self) -> Result<&WorkspaceFolder, ExportError> {
        self.workspace_folder
            .as_ref()
            .ok_or_else(|| ExportError::Resolution {
                message: "No workspace folder selected".to_string(),
                handler: None,
            })
    }

    /// Whether a step earlier in the flow can be returned to
    pub fn can_go_back(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Pop the most recent interactive step; going all the way back to
    /// project resolution flags a restart of the outer loop.
    pub fn go_back(&mut self) -> ExportStep {
        let step = self.steps.pop().unwrap_or(ExportStep::ResolveProject);
        if step == ExportStep::ResolveProject {
            self.back_to_project_step = true;
        }
        step
    }

    /// Main class as written to the manifest
    pub fn main_class(&self) -> Option<&str> {
        self.selected_main_method
            .as_deref()
            .filter(|main| !main.is_empty())
    }
}

#[cfg(test)]
mod tests {
    include!("metadata.test.rs");
}
