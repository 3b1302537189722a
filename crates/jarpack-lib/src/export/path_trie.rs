//! Longest-prefix index over classpath roots
//!
//! Roots and lookups are split on `/`; callers normalize paths first
//! (see [`crate::export::glob::normalize_path`]). Segment comparison is exact
//! and case-sensitive.

use std::collections::HashMap;

/// One path segment in the trie
#[derive(Debug, Clone, Default)]
pub struct PathTrieNode {
    key: String,
    value: Option<String>,
    children: HashMap<String, PathTrieNode>,
}

impl PathTrieNode {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            value: None,
            children: HashMap::new(),
        }
    }

    /// Segment this node stands for (empty for the root)
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The root exactly as inserted, present only on insertion targets
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn children(&self) -> &HashMap<String, PathTrieNode> {
        &self.children
    }

    pub fn child(&self, segment: &str) -> Option<&PathTrieNode> {
        self.children.get(segment)
    }
}

/// Prefix tree of registered classpath roots
#[derive(Debug, Clone, Default)]
pub struct PathTrie {
    root: PathTrieNode,
    len: usize,
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

impl PathTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `root`. Re-inserting a root overwrites its value.
    pub fn insert(&mut self, root: &str) {
        let mut current = &mut self.root;
        for segment in segments(root) {
            current = current
                .children
                .entry(segment.to_string())
                .or_insert_with(|| PathTrieNode::new(segment));
        }
        if current.value.is_none() {
            self.len += 1;
        }
        current.value = Some(root.to_string());
    }

    /// Node reached by walking every segment of `path`, or `None` as soon as a
    /// segment has no matching child. Intermediate nodes carry no value.
    pub fn find(&self, path: &str) -> Option<&PathTrieNode> {
        let mut current = &self.root;
        for segment in segments(path) {
            current = current.children.get(segment)?;
        }
        Some(current)
    }

    /// Deepest inserted root that is `path` itself or one of its ancestors
    pub fn longest_prefix(&self, path: &str) -> Option<&str> {
        let mut current = &self.root;
        let mut deepest = current.value();
        for segment in segments(path) {
            match current.children.get(segment) {
                Some(child) => {
                    current = child;
                    if current.value.is_some() {
                        deepest = current.value();
                    }
                }
                None => break,
            }
        }
        deepest
    }

    /// Number of distinct roots inserted
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<S: AsRef<str>> FromIterator<S> for PathTrie {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut trie = PathTrie::new();
        for root in iter {
            trie.insert(root.as_ref());
        }
        trie
    }
}

#[cfg(test)]
mod tests {
    include!("path_trie.test.rs");
}
