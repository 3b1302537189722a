//! Jar export core
//!
//! - [`path_trie`] - longest-prefix index over classpath roots
//! - [`tokens`] - symbolic classpath token grammar
//! - [`classpath`] - token substitution and source/dependency resolution
//! - [`glob`] - glob expansion with negation
//! - [`metadata`] - the context threaded through every step
//! - [`steps`] - step executors
//! - [`pipeline`] - the outer/inner export loops and single-flight guard
//! - [`task`] - persisted, replayable export configurations
//! - [`archive`] - zip-backed archive writer
//! - [`workspace`] - convention-based build-support collaborator

pub mod archive;
pub mod classpath;
pub mod glob;
pub mod metadata;
pub mod path_trie;
pub mod pipeline;
pub mod steps;
pub mod task;
pub mod tokens;
pub mod workspace;

pub use archive::{ArchiveRequest, ZipArchiveWriter};
pub use classpath::{ClasspathResolver, ClasspathResult, ProjectClasspath, ResolvedClasspath};
pub use metadata::{
    ClasspathEntry, MainClassInfo, OutputTarget, ProjectInfo, StepMetadata, WorkspaceFolder,
};
pub use path_trie::{PathTrie, PathTrieNode};
pub use pipeline::{ExportOutcome, PipelineController};
pub use steps::StepExecutor;
pub use task::{ExportTask, ExportTaskDefinition, TaskSource, TaskStore, TaskStoreError};
pub use tokens::ClasspathToken;
pub use workspace::WorkspaceBuildSupport;

use thiserror::Error;

/// Sentinel for "ask the user where to write the jar"
pub const SETTING_ASK_USER: &str = "Browse...";

/// Follow-up action offered alongside an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOption {
    pub title: String,
    pub command: String,
}

/// Export pipeline errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("An export is already running")]
    Busy,

    #[error(
        "No java project found in '{folder}'. Please make sure your Java project exists in the workspace."
    )]
    NoProjectFound { folder: String },

    #[error("Invalid classpath entry '{token}': {reason}")]
    InvalidToken {
        token: String,
        reason: String,
        handler: Option<MessageOption>,
    },

    #[error("{message}")]
    Resolution {
        message: String,
        handler: Option<MessageOption>,
    },

    #[error("{operation} failed: {message}")]
    Collaborator { operation: String, message: String },

    #[error("Failed to write jar: {message}")]
    ArchiveWrite { message: String },

    #[error("Export cancelled")]
    Cancelled,

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Suggested follow-up, when the error carries one
    pub fn handler(&self) -> Option<&MessageOption> {
        match self {
            ExportError::InvalidToken { handler, .. } | ExportError::Resolution { handler, .. } => {
                handler.as_ref()
            }
            _ => None,
        }
    }

    pub(crate) fn collaborator(operation: &str, err: impl std::fmt::Display) -> Self {
        ExportError::Collaborator {
            operation: operation.to_string(),
            message: format!("{:#}", err),
        }
    }
}
