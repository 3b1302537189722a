//! Command session architecture
//!
//! Implements the Session-Scoped Dependency Injection Pattern.
//! Each command execution creates a session that owns every collaborator the
//! export pipeline talks to; business logic only ever sees [`Session`].

use crate::application::config::AppConfig;
use crate::display::{Display, DisplayProvider, LiveDisplayProvider, ProgressTracker};
use crate::export::{
    ArchiveRequest, ClasspathResult, MainClassInfo, ProjectInfo, WorkspaceBuildSupport,
    WorkspaceFolder, ZipArchiveWriter,
};
use crate::primitives::ClasspathScope;
use anyhow::{Context, Result};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

/// Boxed future returned by async provider methods
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Provider trait for the Java build-support collaborator
pub trait BuildSupportProvider: Send + Sync {
    /// Whether the build backend can answer queries yet
    fn is_server_ready(&self) -> ProviderFuture<'_, bool>;

    /// Make sure compiled output is up to date; `false` aborts the export
    fn build_workspace(&self) -> ProviderFuture<'_, bool>;

    /// Projects under a workspace folder, in a stable order
    fn get_projects<'a>(&'a self, folder: &'a WorkspaceFolder) -> ProviderFuture<'a, Vec<ProjectInfo>>;

    /// Raw classpath of one project for one scope
    fn get_classpaths<'a>(
        &'a self,
        project: &'a ProjectInfo,
        scope: ClasspathScope,
    ) -> ProviderFuture<'a, ClasspathResult>;

    /// Classes declaring a `main` entry point
    fn get_main_classes<'a>(
        &'a self,
        folder: &'a WorkspaceFolder,
    ) -> ProviderFuture<'a, Vec<MainClassInfo>>;
}

/// Provider trait for writing the final archive
pub trait ArchiveProvider: Send + Sync {
    /// Write `request` and return the path actually produced
    fn write_archive<'a>(
        &'a self,
        request: &'a ArchiveRequest,
        progress: &'a dyn ProgressTracker,
    ) -> ProviderFuture<'a, PathBuf>;
}

/// Provider trait for configuration access
pub trait ConfigProvider {
    /// Get the application configuration
    fn app_config(&self) -> &AppConfig;
}

/// Provider trait for interactive user input operations
pub trait InteractiveProvider {
    /// Whether prompts actually reach a user
    fn is_interactive(&self) -> bool;

    /// Prompt for text input with optional default value
    fn text_input(&self, prompt: &str, default: String) -> Result<String>;

    /// Prompt for fuzzy selection from a list of options
    /// Returns Some(index) if user selected, None if user pressed ESC
    fn fuzzy_select(&self, prompt: &str, options: &[String]) -> Result<Option<usize>>;
}

/// Session trait that both CommandSession and MockCommandSession implement
pub trait Session {
    fn display(&self) -> &dyn DisplayProvider;

    fn build_support(&self) -> &dyn BuildSupportProvider;

    fn archive(&self) -> &dyn ArchiveProvider;

    fn config(&self) -> &dyn ConfigProvider;

    fn interactive(&self) -> &dyn InteractiveProvider;

    /// Configured workspace folders, in configuration order
    fn workspace_folders(&self) -> Vec<WorkspaceFolder> {
        self.config()
            .app_config()
            .folders
            .iter()
            .cloned()
            .map(WorkspaceFolder::from_path)
            .collect()
    }
}

/// Live implementation of ConfigProvider
pub struct LiveConfigProvider {
    app_config: AppConfig,
}

impl LiveConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for LiveConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

/// Live implementation of InteractiveProvider
pub struct LiveInteractiveProvider {
    yes_mode: bool,
}

impl LiveInteractiveProvider {
    pub fn new(yes_mode: bool) -> Self {
        Self { yes_mode }
    }

    /// Check if we're in a TTY environment suitable for interactive prompts
    fn is_tty() -> bool {
        use std::io::IsTerminal;
        std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
    }
}

impl InteractiveProvider for LiveInteractiveProvider {
    fn is_interactive(&self) -> bool {
        !self.yes_mode && Self::is_tty()
    }

    fn text_input(&self, prompt: &str, default: String) -> Result<String> {
        if !self.is_interactive() {
            return Ok(default);
        }

        use dialoguer::Input;

        Input::new()
            .with_prompt(prompt)
            .default(default)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read text input")
    }

    fn fuzzy_select(&self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        if !self.is_interactive() {
            return Ok(Some(0));
        }

        use dialoguer::FuzzySelect;

        FuzzySelect::new()
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .max_length(8)
            .interact_opt()
            .context("Failed to read fuzzy selection")
    }
}

/// CommandSession owns all ephemeral state for a single command execution
pub struct CommandSession<B, A, C, I>
where
    B: BuildSupportProvider,
    A: ArchiveProvider,
    C: ConfigProvider,
    I: InteractiveProvider,
{
    display_provider: LiveDisplayProvider,
    build_support_provider: B,
    archive_provider: A,
    config_provider: C,
    interactive_provider: I,
}

impl CommandSession<WorkspaceBuildSupport, ZipArchiveWriter, LiveConfigProvider, LiveInteractiveProvider> {
    /// Create a new command session with owned state (production composition)
    pub fn new(app_config: AppConfig) -> Self {
        let color = app_config.color.enabled();
        Display::init(color);
        if let Err(e) = crate::logger::Logger::init(app_config.to_logger_config()) {
            tracing::debug!(error = %e, "Logger already installed");
        }

        Self {
            display_provider: LiveDisplayProvider::new(),
            build_support_provider: WorkspaceBuildSupport::new(app_config.folders.clone()),
            archive_provider: ZipArchiveWriter::new(),
            interactive_provider: LiveInteractiveProvider::new(app_config.yes),
            config_provider: LiveConfigProvider::new(app_config),
        }
    }
}

impl<B, A, C, I> CommandSession<B, A, C, I>
where
    B: BuildSupportProvider,
    A: ArchiveProvider,
    C: ConfigProvider,
    I: InteractiveProvider,
{
    /// Create a new generic command session with custom providers (for testing)
    #[cfg(feature = "test-utils")]
    pub fn new_with_providers(
        build_support_provider: B,
        archive_provider: A,
        config_provider: C,
        interactive_provider: I,
    ) -> Self {
        Self {
            display_provider: LiveDisplayProvider::new(),
            build_support_provider,
            archive_provider,
            config_provider,
            interactive_provider,
        }
    }
}

impl<B, A, C, I> Session for CommandSession<B, A, C, I>
where
    B: BuildSupportProvider,
    A: ArchiveProvider,
    C: ConfigProvider,
    I: InteractiveProvider,
{
    fn display(&self) -> &dyn DisplayProvider {
        &self.display_provider
    }

    fn build_support(&self) -> &dyn BuildSupportProvider {
        &self.build_support_provider
    }

    fn archive(&self) -> &dyn ArchiveProvider {
        &self.archive_provider
    }

    fn config(&self) -> &dyn ConfigProvider {
        &self.config_provider
    }

    fn interactive(&self) -> &dyn InteractiveProvider {
        &self.interactive_provider
    }
}
