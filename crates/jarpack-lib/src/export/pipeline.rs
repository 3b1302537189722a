//! Export pipeline controller
//!
//! The outer loop acquires a project (and restarts when a step asks to go
//! back to project selection); the inner loop walks the remaining steps until
//! one of them returns `Finish`. Only one export runs per controller at a time.

use crate::application::session::Session;
use crate::export::steps::StepExecutor;
use crate::export::{ClasspathResolver, ExportError, OutputTarget, StepMetadata};
use crate::primitives::ExportStep;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::Instrument;

static GLOBAL_CONTROLLER: OnceLock<PipelineController> = OnceLock::new();

/// How one invocation of the controller ended
#[derive(Debug)]
pub enum ExportOutcome {
    Exported(PathBuf),
    /// Another export held the guard; nothing was done
    Busy,
    /// A precondition failed before any step ran
    Aborted,
    Cancelled,
    Failed(ExportError),
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExportOutcome::Exported(_))
    }
}

/// Result of a single pass through the outer loop
enum Attempt {
    Restart,
    Done(ExportOutcome),
}

/// Clears the busy flag when the attempt ends, however it ends
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Single-flight export driver
#[derive(Debug, Clone, Default)]
pub struct PipelineController {
    busy: Arc<AtomicBool>,
}

impl PipelineController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide controller shared by every command
    pub fn global() -> &'static PipelineController {
        GLOBAL_CONTROLLER.get_or_init(PipelineController::new)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                flag: self.busy.clone(),
            })
    }

    /// Run the full export flow starting from `seed`.
    ///
    /// Every pass starts from a fresh copy of `seed`; a pass that ends with a
    /// request to return to project selection starts the next one.
    pub async fn export(&self, session: &dyn Session, seed: StepMetadata) -> ExportOutcome {
        self.export_with_context(session, seed).await.0
    }

    /// Like [`PipelineController::export`], also handing back the context of
    /// the last pass (`None` when no pass ran)
    pub async fn export_with_context(
        &self,
        session: &dyn Session,
        seed: StepMetadata,
    ) -> (ExportOutcome, Option<StepMetadata>) {
        loop {
            if !check_preconditions(session).await {
                return (ExportOutcome::Aborted, None);
            }

            let Some(_guard) = self.try_acquire() else {
                tracing::warn!("Export requested while another export is running");
                session
                    .display()
                    .status()
                    .warning(&ExportError::Busy.to_string());
                return (ExportOutcome::Busy, None);
            };

            let mut metadata = seed.clone();
            match run_attempt(session, &mut metadata).await {
                Attempt::Restart => {
                    tracing::info!("Returning to project selection");
                    continue;
                }
                Attempt::Done(outcome) => return (outcome, Some(metadata)),
            }
        }
    }
}

/// Run one step and return the next; `Finish` is terminal
pub async fn execute_step(
    step: ExportStep,
    metadata: &mut StepMetadata,
    session: &dyn Session,
) -> Result<ExportStep, ExportError> {
    match StepExecutor::for_step(step) {
        Some(executor) => executor.execute(metadata, session).await,
        None => Ok(ExportStep::Finish),
    }
}

async fn check_preconditions(session: &dyn Session) -> bool {
    let status = session.display().status();
    let build_support = session.build_support();

    match build_support.is_server_ready().await {
        Ok(true) => {}
        Ok(false) => {
            status.warning("Build support is not ready yet, try again in a moment");
            return false;
        }
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "Readiness check failed");
            status.warning("Build support is not ready yet, try again in a moment");
            return false;
        }
    }

    match build_support.build_workspace().await {
        Ok(true) => true,
        Ok(false) => {
            status.error("Workspace build failed", "compile the projects before exporting");
            false
        }
        Err(e) => {
            status.error("Workspace build failed", &format!("{:#}", e));
            false
        }
    }
}

async fn run_attempt(session: &dyn Session, metadata: &mut StepMetadata) -> Attempt {
    if let Err(e) = execute_step(ExportStep::ResolveProject, metadata, session).await {
        return Attempt::Done(report_error(session, e));
    }

    let folder_name = match metadata.workspace_folder() {
        Ok(folder) => folder.name.clone(),
        Err(e) => return Attempt::Done(report_error(session, e)),
    };

    let result = async {
        prepare_content(metadata, session).await?;
        create_archive(metadata, session).await
    }
    .instrument(crate::export_span!(folder_name))
    .await;

    match result {
        Ok(Some(path)) => {
            report_success(session, &path);
            Attempt::Done(ExportOutcome::Exported(path))
        }
        Ok(None) if metadata.back_to_project_step => Attempt::Restart,
        Ok(None) => Attempt::Done(ExportOutcome::Cancelled),
        Err(e) => Attempt::Done(report_error(session, e)),
    }
}

/// Resolve `elements` into archive sources and dependencies
async fn prepare_content(
    metadata: &mut StepMetadata,
    session: &dyn Session,
) -> Result<(), ExportError> {
    let folder = metadata.workspace_folder()?.clone();
    let resolver =
        ClasspathResolver::load(session.build_support(), &folder, &metadata.project_list).await?;
    let resolved = resolver.resolve(&metadata.elements)?;

    tracing::info!(
        sources = resolved.sources.len(),
        dependencies = resolved.dependencies.len(),
        "Resolved archive content"
    );
    metadata.sources = resolved.sources;
    metadata.dependencies = resolved.dependencies;
    Ok(())
}

/// Inner loop: `Some(path)` on `Finish`, `None` when a step went back to
/// project selection
async fn create_archive(
    metadata: &mut StepMetadata,
    session: &dyn Session,
) -> Result<Option<PathBuf>, ExportError> {
    let mut step = ExportStep::ResolveMainMethod;
    loop {
        match step {
            ExportStep::ResolveProject => return Ok(None),
            ExportStep::Finish => {
                return metadata
                    .output_path
                    .as_ref()
                    .and_then(OutputTarget::as_path)
                    .map(|path| Some(path.to_path_buf()))
                    .ok_or_else(|| ExportError::Resolution {
                        message: "Export finished without an output path".to_string(),
                        handler: None,
                    });
            }
            current => step = execute_step(current, metadata, session).await?,
        }
    }
}

fn report_success(session: &dyn Session, path: &Path) {
    let status = session.display().status();
    status.success("Successfully exported jar to", &path.display().to_string());
    if let Some(parent) = path.parent() {
        status.subtle(&format!("Open containing folder: {}", parent.display()));
    }
}

fn report_error(session: &dyn Session, error: ExportError) -> ExportOutcome {
    if let ExportError::Cancelled = error {
        tracing::info!("Export cancelled");
        return ExportOutcome::Cancelled;
    }

    tracing::error!(error = %error, "Export failed");
    let status = session.display().status();
    status.error("Export failed", &error.to_string());
    if let Some(handler) = error.handler() {
        status.info(&format!("{}: run `{}`", handler.title, handler.command));
    }
    ExportOutcome::Failed(error)
}

#[cfg(test)]
mod tests {
    include!("pipeline.test.rs");
}
