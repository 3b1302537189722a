//! Mock implementations of session providers for testing
//!
//! These mocks let the export pipeline and command handlers run without a
//! build backend, real prompts or archive output.

use crate::application::config::AppConfig;
use crate::application::session::*;
use crate::display::{DisplayProvider, MockDisplayProvider, ProgressTracker};
use crate::export::{ArchiveRequest, ClasspathResult, MainClassInfo, ProjectInfo, WorkspaceFolder};
use crate::primitives::ClasspathScope;
use anyhow::Result;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Recorded build-support query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildSupportCall {
    IsServerReady,
    BuildWorkspace,
    GetProjects { folder: PathBuf },
    GetClasspaths { project: String, scope: ClasspathScope },
    GetMainClasses { folder: PathBuf },
}

/// Holds `get_projects` until released, so tests can observe an export mid-flight
#[derive(Debug, Default)]
pub struct MockGate {
    entered: Notify,
    release: Notify,
}

impl MockGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Resolves once a gated call is waiting
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// Mock build-support provider for testing
#[derive(Clone)]
pub struct MockBuildSupportProvider {
    server_ready: bool,
    build_succeeds: bool,
    projects: Vec<ProjectInfo>,
    folder_projects: HashMap<PathBuf, Vec<ProjectInfo>>,
    classpaths: HashMap<(String, ClasspathScope), ClasspathResult>,
    main_classes: Vec<MainClassInfo>,
    failure: Option<String>,
    gate: Option<Arc<MockGate>>,
    calls: Arc<Mutex<Vec<BuildSupportCall>>>,
}

impl MockBuildSupportProvider {
    pub fn new() -> Self {
        Self {
            server_ready: true,
            build_succeeds: true,
            projects: Vec::new(),
            folder_projects: HashMap::new(),
            classpaths: HashMap::new(),
            main_classes: Vec::new(),
            failure: None,
            gate: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_server_ready(mut self, ready: bool) -> Self {
        self.server_ready = ready;
        self
    }

    pub fn with_build_result(mut self, succeeds: bool) -> Self {
        self.build_succeeds = succeeds;
        self
    }

    /// Projects returned for every folder without a folder-specific list
    pub fn with_projects(mut self, projects: Vec<ProjectInfo>) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_folder_projects(mut self, folder: PathBuf, projects: Vec<ProjectInfo>) -> Self {
        self.folder_projects.insert(folder, projects);
        self
    }

    pub fn with_classpath(mut self, project: &str, scope: ClasspathScope, result: ClasspathResult) -> Self {
        self.classpaths.insert((project.to_string(), scope), result);
        self
    }

    pub fn with_main_classes(mut self, classes: Vec<MainClassInfo>) -> Self {
        self.main_classes = classes;
        self
    }

    /// Make every project query fail with `message`
    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn with_gate(mut self, gate: Arc<MockGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn get_calls(&self) -> Vec<BuildSupportCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_project_queries(&self) -> usize {
        self.get_calls()
            .iter()
            .filter(|call| matches!(call, BuildSupportCall::GetProjects { .. }))
            .count()
    }

    fn record(&self, call: BuildSupportCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockBuildSupportProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildSupportProvider for MockBuildSupportProvider {
    fn is_server_ready(&self) -> ProviderFuture<'_, bool> {
        self.record(BuildSupportCall::IsServerReady);
        let ready = self.server_ready;
        Box::pin(async move { Ok(ready) })
    }

    fn build_workspace(&self) -> ProviderFuture<'_, bool> {
        self.record(BuildSupportCall::BuildWorkspace);
        let succeeds = self.build_succeeds;
        Box::pin(async move { Ok(succeeds) })
    }

    fn get_projects<'a>(&'a self, folder: &'a WorkspaceFolder) -> ProviderFuture<'a, Vec<ProjectInfo>> {
        self.record(BuildSupportCall::GetProjects {
            folder: folder.path.clone(),
        });
        Box::pin(async move {
            if let Some(gate) = &self.gate {
                gate.entered.notify_one();
                gate.release.notified().await;
            }
            if let Some(message) = &self.failure {
                return Err(anyhow::anyhow!("{}", message));
            }
            Ok(self
                .folder_projects
                .get(&folder.path)
                .cloned()
                .unwrap_or_else(|| self.projects.clone()))
        })
    }

    fn get_classpaths<'a>(
        &'a self,
        project: &'a ProjectInfo,
        scope: ClasspathScope,
    ) -> ProviderFuture<'a, ClasspathResult> {
        self.record(BuildSupportCall::GetClasspaths {
            project: project.name.clone(),
            scope,
        });
        let result = self
            .classpaths
            .get(&(project.name.clone(), scope))
            .cloned()
            .unwrap_or_default();
        Box::pin(async move { Ok(result) })
    }

    fn get_main_classes<'a>(
        &'a self,
        folder: &'a WorkspaceFolder,
    ) -> ProviderFuture<'a, Vec<MainClassInfo>> {
        self.record(BuildSupportCall::GetMainClasses {
            folder: folder.path.clone(),
        });
        let classes = self.main_classes.clone();
        Box::pin(async move { Ok(classes) })
    }
}

/// Mock archive provider that records requests instead of writing jars
#[derive(Clone, Default)]
pub struct MockArchiveProvider {
    failure: Option<String>,
    requests: Arc<Mutex<Vec<ArchiveRequest>>>,
}

impl MockArchiveProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn get_requests(&self) -> Vec<ArchiveRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ArchiveProvider for MockArchiveProvider {
    fn write_archive<'a>(
        &'a self,
        request: &'a ArchiveRequest,
        progress: &'a dyn ProgressTracker,
    ) -> ProviderFuture<'a, PathBuf> {
        self.requests.lock().unwrap().push(request.clone());
        Box::pin(async move {
            if let Some(message) = &self.failure {
                return Err(anyhow::anyhow!("{}", message));
            }
            for _ in 0..request.total_work() {
                progress.inc();
            }
            Ok(request.output_path.clone())
        })
    }
}

/// Mock config provider
pub struct MockConfigProvider {
    app_config: AppConfig,
}

impl MockConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

/// Mock interactive provider with scripted answers
#[derive(Clone)]
pub struct MockInteractiveProvider {
    yes_mode: bool,
    pub text_input_calls: Arc<Mutex<Vec<(String, String)>>>, // (prompt, default)
    pub fuzzy_select_calls: Arc<Mutex<Vec<(String, Vec<String>)>>>, // (prompt, options)
    pub text_input_response: Arc<Mutex<Option<String>>>,
    pub fuzzy_select_responses: Arc<Mutex<VecDeque<Option<usize>>>>,
}

impl MockInteractiveProvider {
    pub fn new() -> Self {
        Self {
            yes_mode: false,
            text_input_calls: Arc::new(Mutex::new(Vec::new())),
            fuzzy_select_calls: Arc::new(Mutex::new(Vec::new())),
            text_input_response: Arc::new(Mutex::new(None)),
            fuzzy_select_responses: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn with_yes_mode(mut self, yes_mode: bool) -> Self {
        self.yes_mode = yes_mode;
        self
    }

    pub fn with_text_input(self, response: &str) -> Self {
        *self.text_input_response.lock().unwrap() = Some(response.to_string());
        self
    }

    /// Queue one fuzzy-select answer; `None` simulates ESC
    pub fn with_fuzzy_select(self, response: Option<usize>) -> Self {
        self.fuzzy_select_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn get_text_input_calls(&self) -> Vec<(String, String)> {
        self.text_input_calls.lock().unwrap().clone()
    }

    pub fn get_fuzzy_select_calls(&self) -> Vec<(String, Vec<String>)> {
        self.fuzzy_select_calls.lock().unwrap().clone()
    }
}

impl Default for MockInteractiveProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractiveProvider for MockInteractiveProvider {
    fn is_interactive(&self) -> bool {
        !self.yes_mode
    }

    fn text_input(&self, prompt: &str, default: String) -> Result<String> {
        self.text_input_calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), default.clone()));

        if self.yes_mode {
            return Ok(default);
        }

        Ok(self
            .text_input_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(default))
    }

    fn fuzzy_select(&self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        self.fuzzy_select_calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), options.to_vec()));

        if self.yes_mode {
            return Ok(Some(0));
        }

        Ok(self
            .fuzzy_select_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Some(0)))
    }
}

/// Mock command session for testing
pub struct MockCommandSession {
    pub display_provider: MockDisplayProvider,
    pub build_support_provider: MockBuildSupportProvider,
    pub archive_provider: MockArchiveProvider,
    pub config_provider: MockConfigProvider,
    pub interactive_provider: MockInteractiveProvider,
}

impl MockCommandSession {
    /// Session over a single workspace folder at `/workspace/demo`
    pub fn new() -> Self {
        let app_config = AppConfig {
            workdir: Some(PathBuf::from("/workspace/demo")),
            folders: vec![PathBuf::from("/workspace/demo")],
            ..AppConfig::default()
        };

        Self {
            display_provider: MockDisplayProvider::new(),
            build_support_provider: MockBuildSupportProvider::new(),
            archive_provider: MockArchiveProvider::new(),
            config_provider: MockConfigProvider::new(app_config),
            interactive_provider: MockInteractiveProvider::new(),
        }
    }

    pub fn with_build_support(mut self, build_support: MockBuildSupportProvider) -> Self {
        self.build_support_provider = build_support;
        self
    }

    pub fn with_archive(mut self, archive: MockArchiveProvider) -> Self {
        self.archive_provider = archive;
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config_provider = MockConfigProvider::new(config);
        self
    }

    pub fn with_interactive(mut self, interactive: MockInteractiveProvider) -> Self {
        self.interactive_provider = interactive;
        self
    }
}

impl Default for MockCommandSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Session for MockCommandSession {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_build_support_records_calls() {
        let project = ProjectInfo::from_path("app", std::path::Path::new("/ws/app")).unwrap();
        let provider = MockBuildSupportProvider::new()
            .with_projects(vec![project.clone()])
            .with_classpath(
                "app",
                ClasspathScope::Runtime,
                ClasspathResult {
                    classpaths: vec!["/ws/app/out".to_string()],
                    modulepaths: Vec::new(),
                },
            );
        let folder = WorkspaceFolder::from_path("/ws");

        assert_eq!(provider.get_projects(&folder).await.unwrap(), vec![project.clone()]);
        let runtime = provider
            .get_classpaths(&project, ClasspathScope::Runtime)
            .await
            .unwrap();
        assert_eq!(runtime.classpaths, vec!["/ws/app/out"]);
        let test = provider.get_classpaths(&project, ClasspathScope::Test).await.unwrap();
        assert!(test.classpaths.is_empty());

        assert_eq!(provider.count_project_queries(), 1);
        assert_eq!(provider.get_calls().len(), 3);
    }

    #[test]
    fn test_mock_interactive_scripted_answers() {
        let interactive = MockInteractiveProvider::new()
            .with_fuzzy_select(Some(2))
            .with_fuzzy_select(None);
        let options = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        assert_eq!(interactive.fuzzy_select("first", &options).unwrap(), Some(2));
        assert_eq!(interactive.fuzzy_select("second", &options).unwrap(), None);
        assert_eq!(interactive.fuzzy_select("third", &options).unwrap(), Some(0));
        assert_eq!(interactive.get_fuzzy_select_calls().len(), 3);
    }
}
