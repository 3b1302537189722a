//! Mock display provider implementation for testing
//!
//! Records every display call for assertion in unit and integration tests.

use super::providers::*;
use std::sync::{Arc, Mutex};

/// Mock implementation of DisplayProvider that records all calls
#[derive(Clone, Default)]
pub struct MockDisplayProvider {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl MockDisplayProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded display calls for testing assertions
    pub fn get_calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    pub fn has_call(&self, expected: &DisplayCall) -> bool {
        self.get_calls().contains(expected)
    }

    /// Get count of calls of a specific type
    pub fn count_calls(&self, call_type: &str) -> usize {
        self.get_calls()
            .iter()
            .filter(|call| call.call_type() == call_type)
            .count()
    }
}

impl DisplayProvider for MockDisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider> {
        Box::new(MockStatusProvider {
            calls: self.calls.clone(),
        })
    }

    fn progress(&self) -> Box<dyn ProgressProvider> {
        Box::new(MockProgressProvider {
            calls: self.calls.clone(),
        })
    }
}

/// Recorded display call for testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    StatusChecking { task: String },
    StatusSuccess { item: String, details: String },
    StatusError { item: String, details: String },
    StatusWarning { message: String },
    StatusInfo { message: String },
    StatusMessage { text: String },
    StatusSubtle { text: String },
    StatusList { items: Vec<String> },
    StatusSection { title: String },

    ProgressBar { total: u64, message: String },
    ProgressInc,
    ProgressTick { item: String },
    ProgressFinish { message: String },
    ProgressAbandon { message: String },
}

impl DisplayCall {
    pub fn call_type(&self) -> &'static str {
        match self {
            DisplayCall::StatusChecking { .. } => "status_checking",
            DisplayCall::StatusSuccess { .. } => "status_success",
            DisplayCall::StatusError { .. } => "status_error",
            DisplayCall::StatusWarning { .. } => "status_warning",
            DisplayCall::StatusInfo { .. } => "status_info",
            DisplayCall::StatusMessage { .. } => "status_message",
            DisplayCall::StatusSubtle { .. } => "status_subtle",
            DisplayCall::StatusList { .. } => "status_list",
            DisplayCall::StatusSection { .. } => "status_section",
            DisplayCall::ProgressBar { .. } => "progress_bar",
            DisplayCall::ProgressInc => "progress_inc",
            DisplayCall::ProgressTick { .. } => "progress_tick",
            DisplayCall::ProgressFinish { .. } => "progress_finish",
            DisplayCall::ProgressAbandon { .. } => "progress_abandon",
        }
    }
}

fn record(calls: &Arc<Mutex<Vec<DisplayCall>>>, call: DisplayCall) {
    if let Ok(mut calls) = calls.lock() {
        calls.push(call);
    }
}

struct MockStatusProvider {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl StatusProvider for MockStatusProvider {
    fn checking(&self, task: &str) {
        record(&self.calls, DisplayCall::StatusChecking { task: task.to_string() });
    }

    fn success(&self, item: &str, details: &str) {
        record(
            &self.calls,
            DisplayCall::StatusSuccess {
                item: item.to_string(),
                details: details.to_string(),
            },
        );
    }

    fn error(&self, item: &str, details: &str) {
        record(
            &self.calls,
            DisplayCall::StatusError {
                item: item.to_string(),
                details: details.to_string(),
            },
        );
    }

    fn warning(&self, message: &str) {
        record(&self.calls, DisplayCall::StatusWarning { message: message.to_string() });
    }

    fn info(&self, message: &str) {
        record(&self.calls, DisplayCall::StatusInfo { message: message.to_string() });
    }

    fn message(&self, text: &str) {
        record(&self.calls, DisplayCall::StatusMessage { text: text.to_string() });
    }

    fn subtle(&self, text: &str) {
        record(&self.calls, DisplayCall::StatusSubtle { text: text.to_string() });
    }

    fn list(&self, items: &[&str]) {
        record(
            &self.calls,
            DisplayCall::StatusList {
                items: items.iter().map(|s| s.to_string()).collect(),
            },
        );
    }

    fn section(&self, title: &str) {
        record(&self.calls, DisplayCall::StatusSection { title: title.to_string() });
    }
}

struct MockProgressProvider {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl ProgressProvider for MockProgressProvider {
    fn bar(&self, total: u64, message: &str) -> Box<dyn ProgressTracker> {
        record(
            &self.calls,
            DisplayCall::ProgressBar {
                total,
                message: message.to_string(),
            },
        );
        Box::new(MockProgressTracker {
            calls: self.calls.clone(),
        })
    }
}

struct MockProgressTracker {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl ProgressTracker for MockProgressTracker {
    fn inc(&self) {
        record(&self.calls, DisplayCall::ProgressInc);
    }

    fn tick(&self, item: &str) {
        record(&self.calls, DisplayCall::ProgressTick { item: item.to_string() });
    }

    fn finish(&self, message: &str) {
        record(&self.calls, DisplayCall::ProgressFinish { message: message.to_string() });
    }

    fn abandon(&self, message: &str) {
        record(&self.calls, DisplayCall::ProgressAbandon { message: message.to_string() });
    }
}

#[cfg(test)]
mod tests {
    include!("mock.test.rs");
}
