//! # jarpack Library
//!
//! Exports Java workspaces to jar files.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Foundation types, errors, and shared coordination
//! - [`logger`] - Structured logging with progress tracking
//! - [`display`] - User-facing status output and progress bars
//! - [`export`] - Classpath resolution, the step pipeline and archive writing
//! - [`application`] - CLI interface, configuration and command sessions
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! // Parse the command line and run the requested command
//! jarpack_lib::main().await?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod display;
pub mod export;
pub mod logger;
pub mod primitives;

// Re-export commonly used types for convenience
pub use application::{AppConfig, Cli, Commands, execute_command};
pub use export::{ExportError, ExportOutcome, PipelineController, StepMetadata};
pub use logger::Logger;
pub use primitives::{
    ClasspathScope, ColorIntent, ConfigError, ExportStep, LogFormat, LogLevel, LogOutput,
    LoggerError,
};

// Private imports for the main function
use anyhow::Result;
use application::CliConfig;

pub async fn main() -> Result<()> {
    // .env files feed clap's env fallbacks, so they load before parsing
    AppConfig::load_env_files()?;

    // Load CLI configuration
    let config = CliConfig::load()?;

    // Execute the command
    execute_command(config).await
}
