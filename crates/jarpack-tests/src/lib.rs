pub mod test_env;

// Re-export key testing utilities
pub use test_env::{TestWorkspace, jar_entries, read_jar_entry};
