//! Persisted export configurations
//!
//! A task is a named, replayable export: its `elements`, output target and
//! manifest. Saved tasks live in `<folder>/.jarpack/tasks.toml`:
//!
//! ```toml
//! [[tasks]]
//! name = "app"
//! elements = ["${compile-output}", "${runtime-dependencies}"]
//! target_path = "${workspaceFolder}/${workspaceFolderBasename}.jar"
//! ```

use crate::export::tokens::{
    self, COMPILE_OUTPUT, RUNTIME_DEPENDENCIES, TEST_COMPILE_OUTPUT, TEST_DEPENDENCIES,
};
use crate::export::{OutputTarget, ProjectInfo, StepMetadata, WorkspaceFolder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TASKS_DIR: &str = ".jarpack";
pub const TASKS_FILE: &str = "tasks.toml";
pub const DEFAULT_TARGET_PATH: &str = "${workspaceFolder}/${workspaceFolderBasename}.jar";

#[derive(Debug, Error)]
pub enum TaskStoreError {
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Failed to serialize tasks: {source}")]
    Serialize {
        #[from]
        source: toml::ser::Error,
    },
}

/// A named export configuration as written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTaskDefinition {
    pub name: String,
    #[serde(default)]
    pub elements: Vec<String>,
    /// `Some("")` exports without a main class and skips the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<PathBuf>,
}

/// Where a task came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskSource {
    /// Generated for the folder's projects
    Default,
    Saved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTask {
    #[serde(flatten)]
    pub definition: ExportTaskDefinition,
    pub source: TaskSource,
}

impl ExportTask {
    /// Default task for a folder: compiled output, test output and both
    /// dependency scopes of every project
    pub fn default_for(folder: &WorkspaceFolder, projects: &[ProjectInfo]) -> Self {
        Self {
            definition: default_definition(folder, projects),
            source: TaskSource::Default,
        }
    }

    /// Capture a finished export so it can be replayed
    pub fn from_metadata(name: &str, metadata: &StepMetadata) -> Self {
        let target_path = metadata
            .output_path
            .as_ref()
            .and_then(OutputTarget::as_path)
            .map(|path| path.to_string_lossy().replace('\\', "/"));

        Self {
            definition: ExportTaskDefinition {
                name: name.to_string(),
                elements: metadata.elements.clone(),
                main_class: metadata.selected_main_method.clone(),
                target_path,
                manifest_path: metadata.manifest_path.clone(),
            },
            source: TaskSource::Saved,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Seed metadata that replays this task in `folder`
    pub fn resolve(&self, folder: &WorkspaceFolder) -> StepMetadata {
        let definition = &self.definition;
        let mut metadata = StepMetadata::new(Some(folder.path.clone()));
        metadata.elements = definition.elements.clone();
        metadata.selected_main_method = definition.main_class.clone();
        metadata.output_path = definition
            .target_path
            .as_deref()
            .map(|target| OutputTarget::resolve(target, folder));
        metadata.manifest_path = definition.manifest_path.as_ref().map(|manifest| {
            if manifest.is_relative() {
                folder.path.join(manifest)
            } else {
                manifest.clone()
            }
        });
        metadata
    }
}

/// Elements and target a folder gets when nothing is saved
pub fn default_definition(folder: &WorkspaceFolder, projects: &[ProjectInfo]) -> ExportTaskDefinition {
    let mut elements = Vec::new();
    if projects.len() > 1 {
        for project in projects {
            elements.push(format!("${{{}:{}}}", COMPILE_OUTPUT, project.name));
            elements.push(format!("${{{}:{}}}", TEST_COMPILE_OUTPUT, project.name));
        }
    } else {
        elements.push(format!("${{{}}}", COMPILE_OUTPUT));
        elements.push(format!("${{{}}}", TEST_COMPILE_OUTPUT));
    }
    elements.push(format!("${{{}}}", RUNTIME_DEPENDENCIES));
    elements.push(format!("${{{}}}", TEST_DEPENDENCIES));

    ExportTaskDefinition {
        name: folder.name.clone(),
        elements,
        main_class: None,
        target_path: Some(DEFAULT_TARGET_PATH.to_string()),
        manifest_path: None,
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskFile {
    #[serde(default)]
    tasks: Vec<ExportTaskDefinition>,
}

/// Saved task definitions of one workspace folder
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn for_folder(folder: &Path) -> Self {
        Self {
            path: folder.join(TASKS_DIR).join(TASKS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<TaskFile, TaskStoreError> {
        if !self.path.exists() {
            return Ok(TaskFile::default());
        }
        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|source| TaskStoreError::Parse {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn store(&self, file: &TaskFile) -> Result<(), TaskStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(file)?)?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<ExportTaskDefinition>, TaskStoreError> {
        Ok(self.load()?.tasks)
    }

    pub fn get(&self, name: &str) -> Result<Option<ExportTaskDefinition>, TaskStoreError> {
        Ok(self.load()?.tasks.into_iter().find(|task| task.name == name))
    }

    /// Save `definition`, replacing any task with the same name
    pub fn save(&self, definition: ExportTaskDefinition) -> Result<(), TaskStoreError> {
        let mut file = self.load()?;
        match file.tasks.iter_mut().find(|task| task.name == definition.name) {
            Some(existing) => *existing = definition,
            None => file.tasks.push(definition),
        }
        self.store(&file)?;
        tracing::debug!(path = %self.path.display(), "Saved export task");
        Ok(())
    }

    /// Rewrite deprecated bare tokens in every saved task; returns how many
    /// tokens changed. The file is left untouched when nothing changes.
    pub fn migrate(&self) -> Result<usize, TaskStoreError> {
        let mut file = self.load()?;
        let mut migrated = 0;
        for task in &mut file.tasks {
            for element in &mut task.elements {
                if let Some(rewritten) = tokens::migrate(element) {
                    tracing::info!(task = %task.name, from = %element, to = %rewritten, "Migrated token");
                    *element = rewritten;
                    migrated += 1;
                }
            }
        }
        if migrated > 0 {
            self.store(&file)?;
        }
        Ok(migrated)
    }
}

#[cfg(test)]
mod tests {
    include!("task.test.rs");
}
