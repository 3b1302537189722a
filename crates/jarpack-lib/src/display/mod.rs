//! Terminal display system
//!
//! User-facing communication (status lines, progress) kept apart from
//! logging. Commands and the export pipeline only ever talk to the
//! [`DisplayProvider`] trait so tests can record what would have been shown.

use std::sync::OnceLock;

pub mod live;
pub mod mock;
pub mod providers;
pub mod styling;

pub use live::LiveDisplayProvider;
pub use mock::{DisplayCall, MockDisplayProvider};
pub use providers::{DisplayProvider, ProgressProvider, ProgressTracker, StatusProvider};
pub use styling::StyleManager;

// Global display state - initialized once from the resolved color intent
static GLOBAL_DISPLAY: OnceLock<Display> = OnceLock::new();

/// Process-wide display settings
#[derive(Debug)]
pub struct Display {
    styling: StyleManager,
}

impl Display {
    /// Initialize the global display. Later calls keep the first settings.
    pub fn init(color: bool) -> &'static Self {
        GLOBAL_DISPLAY.get_or_init(|| {
            console::set_colors_enabled(color);
            console::set_colors_enabled_stderr(color);
            Display {
                styling: StyleManager::new(color),
            }
        })
    }

    /// Style manager of the global display, plain styling when uninitialized
    pub fn styling() -> &'static StyleManager {
        &GLOBAL_DISPLAY
            .get_or_init(|| Display {
                styling: StyleManager::new(false),
            })
            .styling
    }
}
