//! Symbolic classpath token grammar
//!
//! ```text
//! ${compile-output[:project]}        compiled output directories
//! ${test-compile-output[:project]}   test output directories
//! ${runtime-dependencies}            runtime archive dependencies
//! ${test-dependencies}               test archive dependencies
//! <path or glob>                     literal, relative to the workspace folder
//! !<any of the path forms>           negation
//! ```
//!
//! Output placeholders may be embedded in a longer path
//! (`${compile-output}/com/acme/**`). Dependency placeholders must stand alone.

use crate::export::{ExportError, MessageOption};
use crate::primitives::ClasspathScope;
use std::fmt;

pub const COMPILE_OUTPUT: &str = "compile-output";
pub const TEST_COMPILE_OUTPUT: &str = "test-compile-output";
pub const RUNTIME_DEPENDENCIES: &str = "runtime-dependencies";
pub const TEST_DEPENDENCIES: &str = "test-dependencies";

const NEGATION: char = '!';

/// A `${...-output}` placeholder together with the text around it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    pub scope: ClasspathScope,
    /// `None` means every project
    pub project: Option<String>,
    pub prefix: String,
    pub suffix: String,
}

impl OutputTemplate {
    /// Replace the placeholder with one concrete output directory
    pub fn substitute(&self, directory: &str) -> String {
        format!("{}{}{}", self.prefix, directory, self.suffix)
    }

    /// Whether this template applies to the named project
    pub fn applies_to(&self, project: &str) -> bool {
        self.project.as_deref().is_none_or(|p| p == project)
    }

    fn placeholder_name(&self) -> &'static str {
        match self.scope {
            ClasspathScope::Runtime => COMPILE_OUTPUT,
            ClasspathScope::Test => TEST_COMPILE_OUTPUT,
        }
    }
}

/// One parsed entry of an export task's `elements`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathToken {
    /// `${runtime-dependencies}` / `${test-dependencies}`
    Dependencies(ClasspathScope),
    /// Path built from a project's output directories
    Output {
        negated: bool,
        template: OutputTemplate,
    },
    /// Plain path or glob
    Literal { negated: bool, path: String },
}

fn migrate_handler() -> MessageOption {
    MessageOption {
        title: "Migrate saved tasks".to_string(),
        command: "jarpack tasks migrate".to_string(),
    }
}

fn bare_keyword(body: &str) -> Option<&'static str> {
    let name = body.split(':').next().unwrap_or(body);
    [
        COMPILE_OUTPUT,
        TEST_COMPILE_OUTPUT,
        RUNTIME_DEPENDENCIES,
        TEST_DEPENDENCIES,
    ]
    .into_iter()
    .find(|keyword| *keyword == name)
}

impl ClasspathToken {
    pub fn parse(raw: &str) -> Result<Self, ExportError> {
        let (negated, body) = match raw.strip_prefix(NEGATION) {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let invalid = |reason: &str, handler: Option<MessageOption>| ExportError::InvalidToken {
            token: raw.to_string(),
            reason: reason.to_string(),
            handler,
        };

        if body.is_empty() {
            return Err(invalid("empty classpath entry", None));
        }

        // The first `}` closes the placeholder; later braces belong to the glob.
        let placeholder = body
            .find("${")
            .map(|start| (start, body[start + 2..].find('}').map(|len| start + 2 + len)));
        let (start, end) = match placeholder {
            Some((start, Some(end))) => (start, end),
            Some((_, None)) => return Err(invalid("unterminated placeholder", None)),
            None => {
                if bare_keyword(body).is_some() {
                    return Err(invalid(
                        "bare placeholder names are no longer supported, wrap them as ${...}",
                        Some(migrate_handler()),
                    ));
                }
                return Ok(ClasspathToken::Literal {
                    negated,
                    path: body.to_string(),
                });
            }
        };

        let inner = &body[start + 2..end];
        let prefix = &body[..start];
        let suffix = &body[end + 1..];
        let (name, project) = match inner.split_once(':') {
            Some((_, "")) => return Err(invalid("missing project name after ':'", None)),
            Some((name, project)) => (name, Some(project.to_string())),
            None => (inner, None),
        };

        let dependency_scope = match name {
            RUNTIME_DEPENDENCIES => Some(ClasspathScope::Runtime),
            TEST_DEPENDENCIES => Some(ClasspathScope::Test),
            _ => None,
        };
        if let Some(scope) = dependency_scope {
            if negated || project.is_some() || !prefix.is_empty() || !suffix.is_empty() {
                return Err(invalid(
                    "dependency placeholders must stand alone without negation or project",
                    None,
                ));
            }
            return Ok(ClasspathToken::Dependencies(scope));
        }

        let scope = match name {
            COMPILE_OUTPUT => ClasspathScope::Runtime,
            TEST_COMPILE_OUTPUT => ClasspathScope::Test,
            _ => return Err(invalid(&format!("unknown placeholder '{}'", name), None)),
        };

        Ok(ClasspathToken::Output {
            negated,
            template: OutputTemplate {
                scope,
                project,
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            },
        })
    }

    pub fn is_negated(&self) -> bool {
        match self {
            ClasspathToken::Dependencies(_) => false,
            ClasspathToken::Output { negated, .. } | ClasspathToken::Literal { negated, .. } => {
                *negated
            }
        }
    }
}

impl fmt::Display for ClasspathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClasspathToken::Dependencies(ClasspathScope::Runtime) => {
                write!(f, "${{{}}}", RUNTIME_DEPENDENCIES)
            }
            ClasspathToken::Dependencies(ClasspathScope::Test) => {
                write!(f, "${{{}}}", TEST_DEPENDENCIES)
            }
            ClasspathToken::Output { negated, template } => {
                if *negated {
                    write!(f, "{}", NEGATION)?;
                }
                write!(f, "{}${{{}", template.prefix, template.placeholder_name())?;
                if let Some(project) = &template.project {
                    write!(f, ":{}", project)?;
                }
                write!(f, "}}{}", template.suffix)
            }
            ClasspathToken::Literal { negated, path } => {
                if *negated {
                    write!(f, "{}", NEGATION)?;
                }
                write!(f, "{}", path)
            }
        }
    }
}

/// Rewrite a deprecated bare token (`runtime-dependencies`, `compile-output:app`)
/// into the `${...}` form. Returns `None` when the token needs no migration.
pub fn migrate(raw: &str) -> Option<String> {
    let (negation, body) = match raw.strip_prefix(NEGATION) {
        Some(rest) => ("!", rest),
        None => ("", raw),
    };
    if body.contains("${") {
        return None;
    }
    bare_keyword(body).map(|_| format!("{}${{{}}}", negation, body))
}

#[cfg(test)]
mod tests {
    include!("tokens.test.rs");
}
