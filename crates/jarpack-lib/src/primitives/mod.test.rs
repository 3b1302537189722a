use super::*;

#[test]
fn test_log_level_from_verbosity() {
    assert_eq!(LogLevel::from_verbosity(0), LogLevel::Error);
    assert_eq!(LogLevel::from_verbosity(2), LogLevel::Info);
    assert_eq!(LogLevel::from_verbosity(9), LogLevel::Trace);
}

#[test]
fn test_log_level_aliases_parse() {
    assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
    assert_eq!("VERBOSE".parse::<LogLevel>().unwrap(), LogLevel::Trace);
    assert!("loud".parse::<LogLevel>().is_err());
}

#[test]
fn test_log_format_parse() {
    assert_eq!("yml".parse::<LogFormat>().unwrap(), LogFormat::Yaml);
    assert_eq!("plain".parse::<LogFormat>().unwrap(), LogFormat::Text);
}

#[test]
fn test_color_intent_parse_and_resolve() {
    assert_eq!("never".parse::<ColorIntent>().unwrap(), ColorIntent::Never);
    assert_eq!("yes".parse::<ColorIntent>().unwrap(), ColorIntent::Always);
    assert!(ColorIntent::Always.enabled());
    assert!(!ColorIntent::Never.enabled());
}

#[test]
fn test_parse_error_reports_value() {
    let err = "sideways".parse::<LogOutput>().unwrap_err();
    assert!(err.to_string().contains("sideways"));
}
