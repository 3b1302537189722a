use super::*;

#[test]
fn test_default_filter_scopes_crates() {
    let filter = default_filter(LogLevel::Debug);
    assert!(filter.starts_with("jarpack=debug,jarpack_lib=debug"));
    assert!(filter.contains("ignore=warn"));
    assert!(filter.contains("globset=warn"));
}

#[test]
fn test_default_filter_parses() {
    for level in [LogLevel::Error, LogLevel::Info, LogLevel::Trace] {
        assert!(EnvFilter::try_new(default_filter(level)).is_ok());
    }
}

#[test]
fn test_logger_not_initialized_initially() {
    // Other tests in this binary never install a subscriber through Logger
    assert!(!Logger::is_initialized() || Logger::global().is_some());
}
