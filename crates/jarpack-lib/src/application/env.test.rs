use super::*;

fn env_with(configure: impl FnOnce(&mut EnvironmentConfig)) -> EnvironmentConfig {
    let mut env = EnvironmentConfig::default();
    configure(&mut env);
    env
}

#[test]
fn test_no_color_disables_color() {
    let env = env_with(|e| e.no_color = Some("1".to_string()));
    assert_eq!(env.apply_color_config(ColorIntent::Auto), ColorIntent::Never);
}

#[test]
fn test_empty_no_color_is_ignored() {
    let env = env_with(|e| e.no_color = Some(String::new()));
    assert_eq!(env.apply_color_config(ColorIntent::Auto), ColorIntent::Auto);
}

#[test]
fn test_force_color_enables_color() {
    let env = env_with(|e| e.force_color = Some("true".to_string()));
    assert_eq!(env.apply_color_config(ColorIntent::Never), ColorIntent::Always);
}

#[test]
fn test_force_color_beats_no_color_and_clicolor() {
    let env = env_with(|e| {
        e.clicolor = Some("0".to_string());
        e.no_color = Some("1".to_string());
        e.force_color = Some("1".to_string());
    });
    assert_eq!(env.apply_color_config(ColorIntent::Auto), ColorIntent::Always);
}

#[test]
fn test_ci_overrides_everything() {
    let env = env_with(|e| {
        e.ci = Some("true".to_string());
        e.force_color = Some("1".to_string());
    });
    assert!(env.is_ci());
    assert_eq!(env.apply_color_config(ColorIntent::Always), ColorIntent::Never);
}

#[test]
fn test_ci_false_is_not_ci() {
    let env = env_with(|e| e.ci = Some("false".to_string()));
    assert!(!env.is_ci());
}
