//! Step executors
//!
//! Each executor consumes and mutates the shared [`StepMetadata`] and names
//! the step to run next. Executors never assume which step ran before them;
//! everything they depend on is read from the metadata, so running one again
//! after a "back" request starts from whatever is already populated.

use crate::application::session::Session;
use crate::export::archive::ArchiveRequest;
use crate::export::{ExportError, OutputTarget, StepMetadata, WorkspaceFolder};
use crate::primitives::ExportStep;
use std::path::Path;

pub const BACK_OPTION: &str = "← Back";
pub const WITHOUT_MAIN_CLASS_OPTION: &str = "<without main class>";

/// Executor bound to one step of the export state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepExecutor {
    ResolveProject,
    ResolveMainMethod,
    GenerateJar,
}

impl StepExecutor {
    /// Executor for `step`; `Finish` has none
    pub fn for_step(step: ExportStep) -> Option<Self> {
        match step {
            ExportStep::ResolveProject => Some(StepExecutor::ResolveProject),
            ExportStep::ResolveMainMethod => Some(StepExecutor::ResolveMainMethod),
            ExportStep::GenerateJar => Some(StepExecutor::GenerateJar),
            ExportStep::Finish => None,
        }
    }

    pub fn step(&self) -> ExportStep {
        match self {
            StepExecutor::ResolveProject => ExportStep::ResolveProject,
            StepExecutor::ResolveMainMethod => ExportStep::ResolveMainMethod,
            StepExecutor::GenerateJar => ExportStep::GenerateJar,
        }
    }

    /// Run this step and return the next one
    pub async fn execute(
        &self,
        metadata: &mut StepMetadata,
        session: &dyn Session,
    ) -> Result<ExportStep, ExportError> {
        tracing::debug!(step = %self.step(), "Executing step");
        match self {
            StepExecutor::ResolveProject => resolve_project(metadata, session).await,
            StepExecutor::ResolveMainMethod => resolve_main_method(metadata, session).await,
            StepExecutor::GenerateJar => generate_jar(metadata, session).await,
        }
    }
}

async fn resolve_project(
    metadata: &mut StepMetadata,
    session: &dyn Session,
) -> Result<ExportStep, ExportError> {
    let folder = match pick_folder(metadata, session)? {
        Some(folder) => folder,
        None => return Err(ExportError::Cancelled),
    };

    let projects = session
        .build_support()
        .get_projects(&folder)
        .await
        .map_err(|e| ExportError::collaborator("Project discovery", e))?;
    if projects.is_empty() {
        return Err(ExportError::NoProjectFound {
            folder: folder.path.display().to_string(),
        });
    }

    tracing::info!(folder = %folder.name, projects = projects.len(), "Resolved workspace folder");
    metadata.workspace_folder = Some(folder);
    metadata.project_list = projects;
    Ok(ExportStep::ResolveMainMethod)
}

/// Folder to export from: the entry's folder, an already chosen folder, the
/// only configured folder, or the user's choice. `None` when the user backs out.
fn pick_folder(
    metadata: &mut StepMetadata,
    session: &dyn Session,
) -> Result<Option<WorkspaceFolder>, ExportError> {
    let folders = session.workspace_folders();

    if let Some(entry) = &metadata.entry {
        return Ok(Some(folder_for_entry(entry, &folders)));
    }

    if let Some(folder) = &metadata.workspace_folder {
        return Ok(Some(folder.clone()));
    }

    match folders.len() {
        0 => Err(ExportError::Resolution {
            message: "No workspace folder configured".to_string(),
            handler: None,
        }),
        1 => Ok(folders.into_iter().next()),
        _ => {
            let names: Vec<String> = folders
                .iter()
                .map(|folder| format!("{} ({})", folder.name, folder.path.display()))
                .collect();
            let interactive = session.interactive();
            let choice = interactive
                .fuzzy_select("Select the folder to export from", &names)
                .map_err(|e| ExportError::collaborator("Folder selection", e))?;
            if interactive.is_interactive() {
                metadata.steps.push(ExportStep::ResolveProject);
            }
            Ok(choice.and_then(|index| folders.into_iter().nth(index)))
        }
    }
}

/// Deepest configured folder containing `entry`, or `entry` itself when none does
pub fn folder_for_entry(entry: &Path, folders: &[WorkspaceFolder]) -> WorkspaceFolder {
    folders
        .iter()
        .filter(|folder| entry.starts_with(&folder.path))
        .max_by_key(|folder| folder.path.components().count())
        .cloned()
        .unwrap_or_else(|| WorkspaceFolder::from_path(entry))
}

async fn resolve_main_method(
    metadata: &mut StepMetadata,
    session: &dyn Session,
) -> Result<ExportStep, ExportError> {
    if metadata.selected_main_method.is_some() {
        return Ok(ExportStep::GenerateJar);
    }

    let folder = metadata.workspace_folder()?.clone();
    let candidates = session
        .build_support()
        .get_main_classes(&folder)
        .await
        .map_err(|e| ExportError::collaborator("Main class discovery", e))?;

    if candidates.is_empty() {
        tracing::info!("No main class found; exporting without one");
        metadata.selected_main_method = Some(String::new());
        return Ok(ExportStep::GenerateJar);
    }

    let offer_back = metadata.can_go_back();
    let mut options = Vec::with_capacity(candidates.len() + 2);
    if offer_back {
        options.push(BACK_OPTION.to_string());
    }
    options.extend(candidates.iter().map(|candidate| candidate.name.clone()));
    options.push(WITHOUT_MAIN_CLASS_OPTION.to_string());

    let choice = session
        .interactive()
        .fuzzy_select("Select the main class", &options)
        .map_err(|e| ExportError::collaborator("Main class selection", e))?;
    let Some(index) = choice else {
        return Err(ExportError::Cancelled);
    };

    if offer_back && index == 0 {
        let previous = metadata.go_back();
        tracing::info!(step = %previous, "Going back");
        return Ok(previous);
    }

    let selected = options.get(index).cloned().unwrap_or_default();
    metadata.selected_main_method = if selected == WITHOUT_MAIN_CLASS_OPTION {
        Some(String::new())
    } else {
        Some(selected)
    };
    tracing::info!(main_class = ?metadata.main_class(), "Resolved main class");
    Ok(ExportStep::GenerateJar)
}

async fn generate_jar(
    metadata: &mut StepMetadata,
    session: &dyn Session,
) -> Result<ExportStep, ExportError> {
    let folder = metadata.workspace_folder()?.clone();
    let target = metadata
        .output_path
        .clone()
        .unwrap_or_else(|| OutputTarget::resolve(&session.config().app_config().target_folder, &folder));

    let output_path = match target {
        OutputTarget::Path(path) => path,
        OutputTarget::AskUser => {
            let default = folder.path.join(format!("{}.jar", folder.name));
            let answer = session
                .interactive()
                .text_input("Save jar as", default.display().to_string())
                .map_err(|e| ExportError::collaborator("Output selection", e))?;
            if answer.trim().is_empty() {
                return Err(ExportError::Cancelled);
            }
            match OutputTarget::resolve(&answer, &folder) {
                OutputTarget::Path(path) => path,
                OutputTarget::AskUser => return Err(ExportError::Cancelled),
            }
        }
    };

    let request = ArchiveRequest {
        sources: metadata.sources.clone(),
        dependencies: metadata.dependencies.clone(),
        main_class: metadata.main_class().map(str::to_string),
        manifest_path: metadata.manifest_path.clone(),
        output_path,
    };

    let progress = session
        .display()
        .progress()
        .bar(request.total_work(), "Exporting jar");
    let produced = match session.archive().write_archive(&request, progress.as_ref()).await {
        Ok(path) => {
            progress.finish("Jar written");
            path
        }
        Err(e) => {
            progress.abandon("Export failed");
            return Err(ExportError::ArchiveWrite {
                message: format!("{:#}", e),
            });
        }
    };

    metadata.output_path = Some(OutputTarget::Path(produced));
    Ok(ExportStep::Finish)
}

#[cfg(test)]
mod tests {
    include!("steps.test.rs");
}
