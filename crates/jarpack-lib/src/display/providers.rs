//! Display provider traits for dependency injection

/// Provider trait for all user-facing communication
pub trait DisplayProvider {
    /// Status messages with semantic meaning
    fn status(&self) -> Box<dyn StatusProvider>;

    /// Progress for long-running operations
    fn progress(&self) -> Box<dyn ProgressProvider>;
}

/// Provider trait for status updates and user feedback
pub trait StatusProvider {
    /// Display a working/checking status
    fn checking(&self, task: &str);

    /// Display a success status with optional details
    fn success(&self, item: &str, details: &str);

    /// Display an error status with details
    fn error(&self, item: &str, details: &str);

    fn warning(&self, message: &str);

    fn info(&self, message: &str);

    /// Display a simple message without status symbols
    fn message(&self, text: &str);

    /// Display a subtle/secondary message
    fn subtle(&self, text: &str);

    /// Display a list of items with bullets
    fn list(&self, items: &[&str]);

    /// Display a header for a section of work
    fn section(&self, title: &str);
}

/// Provider trait for progress tracking
pub trait ProgressProvider {
    /// Create a progress bar for an operation with a known total
    fn bar(&self, total: u64, message: &str) -> Box<dyn ProgressTracker>;
}

/// Individual progress tracker interface
pub trait ProgressTracker: Send + Sync {
    /// Increment position by 1
    fn inc(&self);

    /// Update message with current item info
    fn tick(&self, item: &str);

    /// Finish with success message
    fn finish(&self, message: &str);

    /// Abandon with error message
    fn abandon(&self, message: &str);
}
