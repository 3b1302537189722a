//! Command execution handlers
//!
//! Every handler receives a [`Session`]; the production entry point builds a
//! [`CommandSession`] while tests hand in mocks.

use crate::application::cli::TaskAction;
use crate::application::session::{CommandSession, Session};
use crate::application::{AppConfig, CliConfig, Commands};
use crate::export::steps::folder_for_entry;
use crate::export::{
    ExportOutcome, ExportTask, OutputTarget, PipelineController, StepMetadata, TaskSource,
    TaskStore, WorkspaceFolder,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Elements used by `export` when none are given
pub const DEFAULT_EXPORT_ELEMENTS: [&str; 2] = ["${compile-output}", "${runtime-dependencies}"];

/// Arguments of the `export` command
#[derive(Debug, Clone, Default)]
pub struct ExportArgs {
    pub path: Option<PathBuf>,
    pub main_class: Option<String>,
    pub output: Option<String>,
    pub manifest: Option<PathBuf>,
    pub elements: Vec<String>,
    pub save_as: Option<String>,
}

/// Execute CLI commands using the session-based architecture
pub async fn execute_command(config: CliConfig) -> Result<()> {
    let app_config =
        AppConfig::from_cli(config.app_config).context("Failed to load configuration")?;
    if let Err(e) = AppConfig::init_global(app_config.clone()) {
        tracing::debug!(error = %e, "Global configuration already set");
    }

    // Create command session (owns all ephemeral state)
    let session = CommandSession::new(app_config);

    let command = match config.command {
        Some(cmd) => cmd,
        None => {
            session
                .display()
                .status()
                .message("jarpack - export Java projects to jar files");
            session
                .display()
                .status()
                .subtle("Run 'jarpack --help' for usage information");
            return Ok(());
        }
    };

    execute_command_with_session(command, &session).await
}

/// Execute a specific command with a provided session (for testing)
pub async fn execute_command_with_session(command: Commands, session: &dyn Session) -> Result<()> {
    execute_command_with_controller(command, session, PipelineController::global()).await
}

/// Execute a command against an explicit controller instead of the global one
pub async fn execute_command_with_controller(
    command: Commands,
    session: &dyn Session,
    controller: &PipelineController,
) -> Result<()> {
    match command {
        Commands::Version => handle_version(session),
        Commands::Export {
            path,
            main_class,
            output,
            manifest,
            elements,
            save_as,
        } => {
            let args = ExportArgs {
                path,
                main_class,
                output,
                manifest,
                elements,
                save_as,
            };
            handle_export(session, controller, args).await
        }
        Commands::Run { name, path } => handle_run(session, controller, &name, path).await,
        Commands::Tasks {
            action: Some(TaskAction::Migrate),
            ..
        } => handle_migrate(session),
        Commands::Tasks { json, action: None } => handle_tasks(session, json).await,
    }
}

fn handle_version(session: &dyn Session) -> Result<()> {
    session
        .display()
        .status()
        .message(&format!("jarpack {}", env!("CARGO_PKG_VERSION")));
    Ok(())
}

/// Anchor a command-line path at the working directory
fn absolute_path(session: &dyn Session, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match &session.config().app_config().workdir {
        Some(workdir) => workdir.join(path),
        None => path.to_path_buf(),
    }
}

/// Folder a command applies to when it can be known up front
fn known_folder(session: &dyn Session, entry: Option<&Path>) -> Option<WorkspaceFolder> {
    let folders = session.workspace_folders();
    match entry {
        Some(entry) => Some(folder_for_entry(entry, &folders)),
        None if folders.len() == 1 => folders.into_iter().next(),
        None => None,
    }
}

async fn handle_export(
    session: &dyn Session,
    controller: &PipelineController,
    args: ExportArgs,
) -> Result<()> {
    let entry = args.path.as_deref().map(|path| absolute_path(session, path));
    let folder = known_folder(session, entry.as_deref());

    let mut seed = StepMetadata::new(entry);
    seed.elements = if args.elements.is_empty() {
        DEFAULT_EXPORT_ELEMENTS.iter().map(|e| e.to_string()).collect()
    } else {
        args.elements
    };
    seed.selected_main_method = args.main_class;
    seed.manifest_path = args.manifest.map(|manifest| absolute_path(session, &manifest));
    if let Some(output) = args.output {
        let anchor = match &folder {
            Some(folder) => folder.clone(),
            None => WorkspaceFolder::from_path(absolute_path(session, Path::new("."))),
        };
        seed.output_path = Some(OutputTarget::resolve(&output, &anchor));
    }

    let (outcome, metadata) = controller.export_with_context(session, seed).await;
    let path = finish_export(session, outcome)?;

    if let (Some(name), Some(metadata)) = (args.save_as, metadata) {
        let folder = metadata
            .workspace_folder()
            .context("Export finished without a workspace folder")?;
        let store = TaskStore::for_folder(&folder.path);
        store
            .save(ExportTask::from_metadata(&name, &metadata).definition)
            .with_context(|| format!("Failed to save task '{}'", name))?;
        session
            .display()
            .status()
            .success("Saved task", &format!("{} ({})", name, store.path().display()));
    }

    tracing::debug!(path = ?path, "Export command finished");
    Ok(())
}

async fn handle_run(
    session: &dyn Session,
    controller: &PipelineController,
    name: &str,
    path: Option<PathBuf>,
) -> Result<()> {
    let folder = match path {
        Some(path) => folder_for_entry(&absolute_path(session, &path), &session.workspace_folders()),
        None => session
            .workspace_folders()
            .into_iter()
            .next()
            .context("No workspace folder configured")?,
    };

    let store = TaskStore::for_folder(&folder.path);
    let task = match store
        .get(name)
        .with_context(|| format!("Failed to read tasks from {}", store.path().display()))?
    {
        Some(definition) => ExportTask {
            definition,
            source: TaskSource::Saved,
        },
        None if name == folder.name => {
            let projects = session
                .build_support()
                .get_projects(&folder)
                .await
                .context("Failed to discover projects")?;
            ExportTask::default_for(&folder, &projects)
        }
        None => anyhow::bail!("No task named '{}' in {}", name, folder.path.display()),
    };

    session.display().status().checking(&format!("Running task {}", task.name()));
    let outcome = controller.export(session, task.resolve(&folder)).await;
    finish_export(session, outcome).map(|_| ())
}

/// Turn an outcome into the command result; success and cancellation are
/// both clean exits
fn finish_export(session: &dyn Session, outcome: ExportOutcome) -> Result<Option<PathBuf>> {
    match outcome {
        ExportOutcome::Exported(path) => Ok(Some(path)),
        ExportOutcome::Cancelled => {
            session.display().status().info("Export cancelled");
            Ok(None)
        }
        ExportOutcome::Busy => anyhow::bail!("Another export is already running"),
        ExportOutcome::Aborted => anyhow::bail!("Export preconditions not met"),
        ExportOutcome::Failed(e) => Err(anyhow::Error::new(e).context("Export failed")),
    }
}

async fn handle_tasks(session: &dyn Session, json: bool) -> Result<()> {
    let mut tasks: Vec<(WorkspaceFolder, ExportTask)> = Vec::new();

    for folder in session.workspace_folders() {
        let projects = match session.build_support().get_projects(&folder).await {
            Ok(projects) => projects,
            Err(e) => {
                tracing::warn!(folder = %folder.name, error = %format!("{:#}", e), "Project discovery failed");
                Vec::new()
            }
        };
        if !projects.is_empty() {
            tasks.push((folder.clone(), ExportTask::default_for(&folder, &projects)));
        }

        let store = TaskStore::for_folder(&folder.path);
        let saved = store
            .list()
            .with_context(|| format!("Failed to read tasks from {}", store.path().display()))?;
        tasks.extend(saved.into_iter().map(|definition| {
            (
                folder.clone(),
                ExportTask {
                    definition,
                    source: TaskSource::Saved,
                },
            )
        }));
    }

    let status = session.display().status();
    if json {
        let listed: Vec<&ExportTask> = tasks.iter().map(|(_, task)| task).collect();
        let rendered =
            serde_json::to_string_pretty(&listed).context("Failed to serialize tasks")?;
        status.message(&rendered);
        return Ok(());
    }

    if tasks.is_empty() {
        status.info("No export tasks found");
        return Ok(());
    }

    let mut current: Option<&Path> = None;
    for (folder, task) in &tasks {
        if current != Some(folder.path.as_path()) {
            status.section(&format!("{} ({})", folder.name, folder.path.display()));
            current = Some(folder.path.as_path());
        }
        let source = match task.source {
            TaskSource::Default => "default",
            TaskSource::Saved => "saved",
        };
        status.message(&format!("{} [{}]", task.name(), source));
        let elements: Vec<&str> = task.definition.elements.iter().map(String::as_str).collect();
        status.list(&elements);
    }
    Ok(())
}

fn handle_migrate(session: &dyn Session) -> Result<()> {
    let status = session.display().status();
    let mut total = 0;
    for folder in session.workspace_folders() {
        let store = TaskStore::for_folder(&folder.path);
        let migrated = store
            .migrate()
            .with_context(|| format!("Failed to migrate {}", store.path().display()))?;
        if migrated > 0 {
            status.success(&folder.name, &format!("{} token(s) migrated", migrated));
        }
        total += migrated;
    }

    if total == 0 {
        status.info("Saved tasks already use the current token syntax");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    include!("commands.test.rs");
}
