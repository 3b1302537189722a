use serde::{Deserialize, Serialize};
use std::fmt;

/// Steps of the jar export state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportStep {
    /// Pick the workspace folder and discover its projects
    ResolveProject,
    /// Choose the class recorded as `Main-Class`
    ResolveMainMethod,
    /// Resolve the output path and hand everything to the archive writer
    GenerateJar,
    /// Terminal state: the archive exists
    Finish,
}

impl ExportStep {
    /// Steps that own an executor (everything but `Finish`)
    pub fn is_executable(&self) -> bool {
        !matches!(self, ExportStep::Finish)
    }
}

impl fmt::Display for ExportStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportStep::ResolveProject => write!(f, "resolve-project"),
            ExportStep::ResolveMainMethod => write!(f, "resolve-main-method"),
            ExportStep::GenerateJar => write!(f, "generate-jar"),
            ExportStep::Finish => write!(f, "finish"),
        }
    }
}

/// Classpath scope requested from the build-support collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClasspathScope {
    Runtime,
    Test,
}

impl fmt::Display for ClasspathScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClasspathScope::Runtime => write!(f, "runtime"),
            ClasspathScope::Test => write!(f, "test"),
        }
    }
}

impl std::str::FromStr for ClasspathScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "runtime" => Ok(ClasspathScope::Runtime),
            "test" => Ok(ClasspathScope::Test),
            _ => Err(format!("Invalid classpath scope: {}", s)),
        }
    }
}
