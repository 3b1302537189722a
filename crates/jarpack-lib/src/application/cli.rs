use crate::primitives::ConfigError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::config::AppConfig;

/// jarpack CLI - export Java workspaces as runnable jars
#[derive(Debug, Clone, Parser)]
#[command(name = "jarpack")]
#[command(about = "Export Java projects to jar files")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    /// jarpack commands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Configuration loaded from CLI
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Option<Commands>,
}

impl CliConfig {
    /// Load configuration from command line arguments
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Cli::parse().into())
    }
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            app_config: cli.config,
            command: cli.command,
        }
    }
}

/// Available jarpack commands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Show version information
    Version,

    /// Export a workspace folder to a jar
    Export {
        /// Path inside the workspace folder to export
        #[arg(help = "Directory to export from (defaults to the workspace folder)")]
        path: Option<PathBuf>,

        /// Main class written to the manifest; "" exports without one
        #[arg(short, long, help = "Fully qualified main class")]
        main_class: Option<String>,

        /// Output jar or directory
        #[arg(short, long, help = "Jar path or folder to write to")]
        output: Option<String>,

        /// Custom manifest written verbatim
        #[arg(long, help = "Manifest file to use instead of the generated one")]
        manifest: Option<PathBuf>,

        /// Classpath elements
        #[arg(
            short,
            long = "element",
            help = "Classpath element: path, glob, !negation or ${compile-output[:project]}"
        )]
        elements: Vec<String>,

        /// Save the export as a named task
        #[arg(long, help = "Save this export as a task under the given name")]
        save_as: Option<String>,
    },

    /// Replay a saved export task
    Run {
        /// Task name
        #[arg(help = "Name of the saved task")]
        name: String,

        /// Workspace folder holding the task
        #[arg(help = "Workspace folder (defaults to the first configured folder)")]
        path: Option<PathBuf>,
    },

    /// List export tasks
    Tasks {
        /// Print tasks as JSON
        #[arg(long, help = "Print tasks as JSON")]
        json: bool,

        #[command(subcommand)]
        action: Option<TaskAction>,
    },
}

/// Task maintenance actions
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum TaskAction {
    /// Rewrite deprecated classpath tokens in saved tasks
    Migrate,
}

impl Commands {
    /// Whether the command runs the export pipeline
    pub fn exports(&self) -> bool {
        matches!(self, Commands::Export { .. } | Commands::Run { .. })
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            command: None,
        }
    }
}

#[cfg(test)]
mod tests {
    include!("cli.test.rs");
}
