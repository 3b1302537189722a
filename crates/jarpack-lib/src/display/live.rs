//! Live display provider implementation
//!
//! Status lines go to stdout through the global [`Display`] styling; progress
//! bars are attached to the session-owned `MultiProgress`.

use super::Display;
use super::providers::*;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Live implementation of DisplayProvider that owns display state for command lifecycle
pub struct LiveDisplayProvider {
    multi_progress: MultiProgress,
}

impl LiveDisplayProvider {
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
        }
    }
}

impl Default for LiveDisplayProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayProvider for LiveDisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider> {
        Box::new(LiveStatusProvider)
    }

    fn progress(&self) -> Box<dyn ProgressProvider> {
        Box::new(LiveProgressProvider {
            parent: self.multi_progress.clone(),
        })
    }
}

/// Live implementation of StatusProvider
struct LiveStatusProvider;

fn with_details(item: &str, details: &str) -> String {
    if details.is_empty() {
        item.to_string()
    } else {
        format!("{}: {}", item, details)
    }
}

impl StatusProvider for LiveStatusProvider {
    fn checking(&self, task: &str) {
        let message = format!("Checking {}...", task);
        println!("{}", Display::styling().format_working(&message));
    }

    fn success(&self, item: &str, details: &str) {
        println!("{}", Display::styling().format_success(&with_details(item, details)));
    }

    fn error(&self, item: &str, details: &str) {
        eprintln!("{}", Display::styling().format_error(&with_details(item, details)));
    }

    fn warning(&self, message: &str) {
        eprintln!("{}", Display::styling().format_warning(message));
    }

    fn info(&self, message: &str) {
        println!("{}", Display::styling().format_info(message));
    }

    fn message(&self, text: &str) {
        println!("{}", text);
    }

    fn subtle(&self, text: &str) {
        println!("{}", Display::styling().style_subtle(text));
    }

    fn list(&self, items: &[&str]) {
        let bullet = Display::styling().bullet();
        for item in items {
            println!("  {} {}", bullet, item);
        }
    }

    fn section(&self, title: &str) {
        println!();
        println!("{}", Display::styling().style_emphasis(title));
    }
}

/// Live implementation of ProgressProvider
struct LiveProgressProvider {
    parent: MultiProgress,
}

impl ProgressProvider for LiveProgressProvider {
    fn bar(&self, total: u64, message: &str) -> Box<dyn ProgressTracker> {
        let bar = self.parent.add(ProgressBar::new(total));
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.green} {msg} [{wide_bar:.cyan/blue}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Box::new(LiveProgressTracker { bar })
    }
}

struct LiveProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker for LiveProgressTracker {
    fn inc(&self) {
        self.bar.inc(1);
    }

    fn tick(&self, item: &str) {
        self.bar.set_message(item.to_string());
    }

    fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    fn abandon(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}
