//! Glob expansion over classpath roots
//!
//! Patterns are normalized to `/` separators. A pattern without glob
//! metacharacters naming a directory expands to everything below it;
//! `!`-prefixed patterns exclude matches from every positive pattern.
//! Dot-files below a walked directory are skipped unless asked for.
//!
//! Concrete directories spliced into a pattern are escaped with
//! [`escape`] (`proj[1]` becomes `proj[[]1[]]`); such bracketed single
//! characters count as literal text when finding the base to walk.

use crate::export::ExportError;
use globset::{GlobBuilder, GlobMatcher, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::Path;

pub use globset::escape;

const GLOB_META: &[char] = &['*', '?', '[', '{'];
const ESCAPABLE: &[char] = &['*', '?', '[', ']', '{', '}'];

/// Lexically normalize a path: `/` separators, no `.`/`..` segments,
/// no trailing separator. Glob metacharacters are left alone.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." && !is_drive(last) => {
                    parts.pop();
                }
                None if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

fn is_drive(segment: &str) -> bool {
    segment.len() == 2 && segment.ends_with(':')
}

/// The literal text of `pattern`, or `None` when it contains a live
/// metacharacter. `[x]` around a single metacharacter is an escape.
pub fn unescape(pattern: &str) -> Option<String> {
    let mut literal = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '[' {
            if GLOB_META.contains(&c) {
                return None;
            }
            literal.push(c);
            continue;
        }
        let mut ahead = chars.clone();
        match (ahead.next(), ahead.next()) {
            (Some(escaped), Some(']')) if ESCAPABLE.contains(&escaped) => {
                literal.push(escaped);
                chars = ahead;
            }
            _ => return None,
        }
    }
    Some(literal)
}

/// Leading segments of `pattern` that contain no glob metacharacters,
/// with escapes removed
pub fn literal_base(pattern: &str) -> String {
    if let Some(literal) = unescape(pattern) {
        return literal;
    }
    let mut base: Vec<String> = Vec::new();
    for segment in pattern.split('/') {
        match unescape(segment) {
            Some(literal) => base.push(literal),
            None => break,
        }
    }
    let joined = base.join("/");
    if joined.is_empty() {
        if pattern.starts_with('/') { "/" } else { "." }.to_string()
    } else {
        joined
    }
}

fn compile(pattern: &str) -> Result<globset::Glob, ExportError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| ExportError::InvalidToken {
            token: pattern.to_string(),
            reason: e.to_string(),
            handler: None,
        })
}

/// A positive pattern ready to be walked
enum Include {
    File(String),
    Walk { base: String, matcher: GlobMatcher },
}

/// Expands positive and negated patterns into a deduplicated file list
#[derive(Debug, Clone, Default)]
pub struct GlobExpander {
    include_hidden: bool,
}

impl GlobExpander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also match dot-files and dot-directories below walked roots
    pub fn with_include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Expand `patterns` in one pass. Results follow pattern order, each walk
    /// sorted by file name; a file reached twice is kept once.
    pub fn expand<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Vec<String>, ExportError> {
        let mut includes = Vec::new();
        let mut excludes = GlobSetBuilder::new();

        for raw in patterns {
            let raw = raw.as_ref();
            let (negated, body) = match raw.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, raw),
            };
            if body.is_empty() {
                continue;
            }
            let pattern = expand_directory(&normalize_path(body));

            if negated {
                excludes.add(compile(&pattern)?);
            } else if let Some(path) = unescape(&pattern) {
                includes.push(Include::File(path));
            } else {
                includes.push(Include::Walk {
                    base: literal_base(&pattern),
                    matcher: compile(&pattern)?.compile_matcher(),
                });
            }
        }

        let excludes = excludes.build().map_err(|e| ExportError::InvalidToken {
            token: "negation patterns".to_string(),
            reason: e.to_string(),
            handler: None,
        })?;

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for include in &includes {
            match include {
                Include::File(path) => {
                    if Path::new(path).is_file() && !excludes.is_match(path) {
                        if seen.insert(path.clone()) {
                            files.push(path.clone());
                        }
                    } else {
                        tracing::debug!(path = %path, "Skipping missing or excluded file");
                    }
                }
                Include::Walk { base, matcher } => {
                    for path in self.walk(base) {
                        if matcher.is_match(&path)
                            && !excludes.is_match(&path)
                            && seen.insert(path.clone())
                        {
                            files.push(path);
                        }
                    }
                }
            }
        }

        Ok(files)
    }

    fn walk(&self, base: &str) -> Vec<String> {
        if !Path::new(base).is_dir() {
            tracing::debug!(base = %base, "Glob base is not a directory");
            return Vec::new();
        }

        let mut builder = WalkBuilder::new(base);
        builder
            .hidden(!self.include_hidden)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        builder
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| normalize_path(&entry.path().to_string_lossy()))
            .collect()
    }
}

/// A plain directory path stands for everything below it
fn expand_directory(pattern: &str) -> String {
    if unescape(pattern).is_some_and(|path| Path::new(&path).is_dir()) {
        if pattern.ends_with('/') {
            format!("{}**", pattern)
        } else {
            format!("{}/**", pattern)
        }
    } else {
        pattern.to_string()
    }
}

#[cfg(test)]
mod tests {
    include!("glob.test.rs");
}
