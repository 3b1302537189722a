//! Application configuration management
//!
//! Handles config loading, validation, and environment variable processing
//! following the precedence: defaults -> .env -> env vars -> CLI args.

use crate::primitives::*;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

/// Default configuration values
pub mod defaults {
    pub const LOG_LEVEL: &str = "1"; // Warnings and errors by default
    pub const LOG_FORMAT: &str = "text";
    pub const LOG_OUTPUT: &str = "stderr";
    pub const COLOR_INTENT: &str = "auto";
    /// `${workspaceFolder}` resolves to `<folder>/<folder name>.jar`
    pub const TARGET_FOLDER: &str = "${workspaceFolder}";
}

/// Default value functions for configuration fields
mod default_fns {
    use crate::primitives::{ColorIntent, LogFormat, LogOutput};

    pub fn log_level() -> u8 {
        1
    }

    pub fn log_format() -> LogFormat {
        LogFormat::Text
    }

    pub fn log_output() -> LogOutput {
        LogOutput::Stderr
    }

    pub fn color_intent() -> ColorIntent {
        ColorIntent::Auto
    }

    pub fn target_folder() -> String {
        super::defaults::TARGET_FOLDER.to_string()
    }
}

/// Application configuration structure
#[derive(Debug, Clone, Parser, Deserialize)]
pub struct AppConfig {
    /// Working directory the export starts from
    #[arg(short, long, env = "JARPACK_WORKDIR")]
    #[serde(default)]
    pub workdir: Option<PathBuf>,

    /// Workspace folders (repeat or comma-separate for multi-root workspaces)
    #[arg(long = "folder", env = "JARPACK_FOLDERS", value_delimiter = ',')]
    #[serde(default)]
    pub folders: Vec<PathBuf>,

    /// Where jars are written; "Browse..." asks every time
    #[arg(short, long, env = "JARPACK_TARGET_FOLDER", default_value = defaults::TARGET_FOLDER)]
    #[serde(default = "default_fns::target_folder")]
    pub target_folder: String,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[arg(long, env = "JARPACK_LOG_LEVEL", default_value = defaults::LOG_LEVEL)]
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Output format (text, json, yaml)
    #[arg(long, env = "JARPACK_LOG_FORMAT", default_value = defaults::LOG_FORMAT)]
    #[serde(default = "default_fns::log_format")]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[arg(long, env = "JARPACK_LOG_OUTPUT", default_value = defaults::LOG_OUTPUT)]
    #[serde(default = "default_fns::log_output")]
    pub log_output: LogOutput,

    /// Color output control (auto, always, never)
    #[arg(short, long, env = "JARPACK_COLOR", default_value = defaults::COLOR_INTENT)]
    #[serde(default = "default_fns::color_intent")]
    pub color: ColorIntent,

    /// Never prompt; every question takes its default answer
    #[arg(short, long, env = "JARPACK_YES")]
    #[serde(default)]
    pub yes: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workdir: None,
            folders: Vec::new(),
            target_folder: default_fns::target_folder(),
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
            color: default_fns::color_intent(),
            yes: false,
        }
    }
}

impl AppConfig {
    /// Create LoggerConfig from AppConfig
    pub fn to_logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            color: self.color.enabled(),
        }
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        if other.workdir.is_some() {
            self.workdir = other.workdir;
        }
        if !other.folders.is_empty() {
            self.folders = other.folders;
        }
        if other.target_folder != defaults::TARGET_FOLDER {
            self.target_folder = other.target_folder;
        }

        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }
        if other.yes {
            self.yes = true;
        }

        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Stderr) {
            self.log_output = other.log_output;
        }
        if !matches!(other.color, ColorIntent::Auto) {
            self.color = other.color;
        }

        self
    }

    /// Validate the final configuration
    ///
    /// Resolves the working directory, anchors relative folders at it and
    /// falls back to the working directory as the only workspace folder.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let workdir = match self.workdir.take() {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        if !workdir.is_dir() {
            return Err(ConfigError::InvalidWorkDir {
                path: workdir.display().to_string(),
            });
        }

        if self.folders.is_empty() {
            self.folders.push(workdir.clone());
        }
        for folder in &mut self.folders {
            if folder.is_relative() {
                *folder = workdir.join(folder.as_path());
            }
        }

        if self.target_folder.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "target folder must not be empty".to_string(),
            });
        }

        self.workdir = Some(workdir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    include!("config.test.rs");
}
