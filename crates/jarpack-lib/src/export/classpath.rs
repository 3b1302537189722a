//! Classpath resolution: token substitution, glob expansion and
//! source/destination mapping
//!
//! Each project's raw classpath is split into output directories (roots) and
//! `.jar` dependencies per scope. Tokens are then substituted against those
//! sets, expanded in one glob pass, and every resulting file is mapped to the
//! deepest registered root that contains it.

use crate::application::session::BuildSupportProvider;
use crate::export::glob::{GlobExpander, escape, literal_base, normalize_path};
use crate::export::tokens::ClasspathToken;
use crate::export::{
    ClasspathEntry, ExportError, PathTrie, ProjectInfo, WorkspaceFolder,
};
use crate::primitives::ClasspathScope;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const ARCHIVE_EXTENSION: &str = "jar";

/// Raw classpath reported by the build-support collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathResult {
    pub classpaths: Vec<String>,
    pub modulepaths: Vec<String>,
}

impl ClasspathResult {
    fn entries(&self) -> impl Iterator<Item = &String> {
        self.classpaths.iter().chain(self.modulepaths.iter())
    }
}

/// Output directories of one project, per scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectClasspath {
    pub name: String,
    pub runtime_roots: Vec<String>,
    pub test_roots: Vec<String>,
}

impl ProjectClasspath {
    fn roots(&self, scope: ClasspathScope) -> &[String] {
        match scope {
            ClasspathScope::Runtime => &self.runtime_roots,
            ClasspathScope::Test => &self.test_roots,
        }
    }
}

/// Tokens after substitution, before globbing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutedElements {
    /// Absolute, normalized patterns; negations keep their `!`
    pub patterns: Vec<String>,
    /// Archive dependencies named by dependency placeholders
    pub dependencies: Vec<String>,
}

/// Final archive content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedClasspath {
    pub sources: Vec<ClasspathEntry>,
    pub dependencies: Vec<String>,
}

fn is_archive(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext == ARCHIVE_EXTENSION)
}

/// Resolves symbolic classpath tokens for one workspace folder
#[derive(Debug, Clone)]
pub struct ClasspathResolver {
    workspace_root: PathBuf,
    projects: Vec<ProjectClasspath>,
    runtime_dependencies: Vec<String>,
    test_dependencies: Vec<String>,
    expander: GlobExpander,
}

impl ClasspathResolver {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            projects: Vec::new(),
            runtime_dependencies: Vec::new(),
            test_dependencies: Vec::new(),
            expander: GlobExpander::new(),
        }
    }

    pub fn with_expander(mut self, expander: GlobExpander) -> Self {
        self.expander = expander;
        self
    }

    /// Query both scopes for every project, in project order
    pub async fn load(
        build_support: &dyn BuildSupportProvider,
        folder: &WorkspaceFolder,
        projects: &[ProjectInfo],
    ) -> Result<Self, ExportError> {
        if projects.is_empty() {
            return Err(ExportError::NoProjectFound {
                folder: folder.path.display().to_string(),
            });
        }

        let mut resolver = Self::new(&folder.path);
        for project in projects {
            let runtime = build_support
                .get_classpaths(project, ClasspathScope::Runtime)
                .await
                .map_err(|e| ExportError::collaborator("Runtime classpath query", e))?;
            let test = build_support
                .get_classpaths(project, ClasspathScope::Test)
                .await
                .map_err(|e| ExportError::collaborator("Test classpath query", e))?;
            tracing::debug!(
                project = %project.name,
                runtime = runtime.classpaths.len() + runtime.modulepaths.len(),
                test = test.classpaths.len() + test.modulepaths.len(),
                "Loaded project classpath"
            );
            resolver.add_project(&project.name, &runtime, &test);
        }
        Ok(resolver)
    }

    /// Partition one project's raw entries into roots and archive dependencies
    pub fn add_project(&mut self, name: &str, runtime: &ClasspathResult, test: &ClasspathResult) {
        let mut project = ProjectClasspath {
            name: name.to_string(),
            ..ProjectClasspath::default()
        };
        for entry in runtime.entries() {
            if is_archive(entry) {
                self.runtime_dependencies.push(entry.clone());
            } else {
                project.runtime_roots.push(entry.clone());
            }
        }
        for entry in test.entries() {
            if is_archive(entry) {
                self.test_dependencies.push(entry.clone());
            } else {
                project.test_roots.push(entry.clone());
            }
        }
        self.projects.push(project);
    }

    pub fn projects(&self) -> &[ProjectClasspath] {
        &self.projects
    }

    pub fn dependencies(&self, scope: ClasspathScope) -> &[String] {
        match scope {
            ClasspathScope::Runtime => &self.runtime_dependencies,
            ClasspathScope::Test => &self.test_dependencies,
        }
    }

    /// Anchor a pattern at the workspace root. The root is escaped so its
    /// own characters never act as glob syntax.
    fn to_absolute(&self, pattern: &str) -> String {
        let candidate = pattern.replace('\\', "/");
        if Path::new(&candidate).is_absolute() || candidate.starts_with('/') {
            normalize_path(&candidate)
        } else {
            let root = self.workspace_root.to_string_lossy().replace('\\', "/");
            normalize_path(&format!("{}/{}", escape(&root), candidate))
        }
    }

    fn negate(negated: bool, path: String) -> String {
        if negated { format!("!{}", path) } else { path }
    }

    /// Replace every placeholder with concrete absolute paths
    pub fn substitute<S: AsRef<str>>(
        &self,
        elements: &[S],
    ) -> Result<SubstitutedElements, ExportError> {
        let mut substituted = SubstitutedElements::default();

        for element in elements {
            match ClasspathToken::parse(element.as_ref())? {
                ClasspathToken::Dependencies(scope) => {
                    substituted.dependencies.extend(
                        self.dependencies(scope)
                            .iter()
                            .map(|dependency| escape(&normalize_path(dependency))),
                    );
                }
                ClasspathToken::Output { negated, template } => {
                    let mut matched = false;
                    for project in self.projects.iter().filter(|p| template.applies_to(&p.name)) {
                        matched = true;
                        for root in project.roots(template.scope) {
                            let root = escape(&root.replace('\\', "/"));
                            let path = self.to_absolute(&template.substitute(&root));
                            substituted.patterns.push(Self::negate(negated, path));
                        }
                    }
                    if !matched {
                        tracing::warn!(
                            element = %element.as_ref(),
                            "Placeholder names no known project; contributes nothing"
                        );
                    }
                }
                ClasspathToken::Literal { negated, path } => {
                    substituted
                        .patterns
                        .push(Self::negate(negated, self.to_absolute(&path)));
                }
            }
        }

        Ok(substituted)
    }

    /// Resolve `elements` into archive sources and dependency archives
    pub fn resolve<S: AsRef<str>>(&self, elements: &[S]) -> Result<ResolvedClasspath, ExportError> {
        let substituted = self.substitute(elements)?;

        let trie: PathTrie = substituted
            .patterns
            .iter()
            .filter(|pattern| !pattern.starts_with('!'))
            .map(|pattern| literal_base(pattern))
            .collect();

        let files = self.expander.expand(&substituted.patterns)?;

        let mut destinations = HashSet::new();
        let mut sources = Vec::new();
        for file in files {
            let Some(root) = trie.longest_prefix(&file) else {
                tracing::debug!(file = %file, "File not under a tracked root; dropped");
                continue;
            };
            let Some(destination) = destination_for(&file, root) else {
                tracing::warn!(file = %file, root = %root, "Unsafe archive destination; dropped");
                continue;
            };
            if destinations.insert(destination.clone()) {
                sources.push(ClasspathEntry {
                    source: file,
                    destination,
                });
            } else {
                tracing::debug!(destination = %destination, "Duplicate destination; first wins");
            }
        }

        let dependencies = self.expander.expand(&substituted.dependencies)?;

        tracing::info!(
            sources = sources.len(),
            dependencies = dependencies.len(),
            "Resolved classpath"
        );
        Ok(ResolvedClasspath {
            sources,
            dependencies,
        })
    }
}

/// Path of `file` relative to `root`; a root that is the file itself maps to
/// its file name. `None` when the result would escape the archive.
pub fn destination_for(file: &str, root: &str) -> Option<String> {
    let rest = file.strip_prefix(root)?;
    if !rest.is_empty() && !rest.starts_with('/') && !root.ends_with('/') {
        return None;
    }
    let rest = rest.trim_start_matches('/');
    let destination = if rest.is_empty() {
        file.rsplit('/').next().unwrap_or(file).to_string()
    } else {
        rest.to_string()
    };
    let escapes = destination.split('/').any(|segment| segment == "..");
    if destination.is_empty() || escapes {
        None
    } else {
        Some(destination)
    }
}

#[cfg(test)]
mod tests {
    include!("classpath.test.rs");
}
