use super::*;

#[test]
fn test_parse_dependency_placeholders() {
    assert_eq!(
        ClasspathToken::parse("${runtime-dependencies}").unwrap(),
        ClasspathToken::Dependencies(ClasspathScope::Runtime)
    );
    assert_eq!(
        ClasspathToken::parse("${test-dependencies}").unwrap(),
        ClasspathToken::Dependencies(ClasspathScope::Test)
    );
}

#[test]
fn test_parse_compile_output_all_projects() {
    let token = ClasspathToken::parse("${compile-output}").unwrap();
    match token {
        ClasspathToken::Output { negated, template } => {
            assert!(!negated);
            assert_eq!(template.scope, ClasspathScope::Runtime);
            assert_eq!(template.project, None);
            assert!(template.applies_to("anything"));
        }
        other => panic!("unexpected token {:?}", other),
    }
}

#[test]
fn test_parse_embedded_negated_test_output_for_project() {
    let token = ClasspathToken::parse("!${test-compile-output:core}/fixtures/**").unwrap();
    match &token {
        ClasspathToken::Output { negated, template } => {
            assert!(*negated);
            assert_eq!(template.scope, ClasspathScope::Test);
            assert_eq!(template.project.as_deref(), Some("core"));
            assert!(template.applies_to("core"));
            assert!(!template.applies_to("app"));
            assert_eq!(
                template.substitute("/ws/core/target/test-classes"),
                "/ws/core/target/test-classes/fixtures/**"
            );
        }
        other => panic!("unexpected token {:?}", other),
    }
    assert!(token.is_negated());
}

#[test]
fn test_parse_literal_paths() {
    assert_eq!(
        ClasspathToken::parse("resources/**").unwrap(),
        ClasspathToken::Literal {
            negated: false,
            path: "resources/**".to_string()
        }
    );
    assert_eq!(
        ClasspathToken::parse("!/ws/out/test/**").unwrap(),
        ClasspathToken::Literal {
            negated: true,
            path: "/ws/out/test/**".to_string()
        }
    );
}

#[test]
fn test_unknown_placeholder_rejected() {
    let err = ClasspathToken::parse("${workspaceFolder}/bin").unwrap_err();
    assert!(err.to_string().contains("unknown placeholder"));
    assert!(err.handler().is_none());
}

#[test]
fn test_dependency_placeholder_must_stand_alone() {
    assert!(ClasspathToken::parse("!${runtime-dependencies}").is_err());
    assert!(ClasspathToken::parse("${runtime-dependencies:app}").is_err());
    assert!(ClasspathToken::parse("lib/${test-dependencies}").is_err());
}

#[test]
fn test_bare_keywords_rejected_with_migration_handler() {
    let err = ClasspathToken::parse("runtime-dependencies").unwrap_err();
    let handler = err.handler().expect("handler");
    assert_eq!(handler.command, "jarpack tasks migrate");

    assert!(ClasspathToken::parse("compile-output:app").is_err());
}

#[test]
fn test_malformed_placeholders() {
    assert!(ClasspathToken::parse("${compile-output").is_err());
    assert!(ClasspathToken::parse("${compile-output:}").is_err());
    assert!(ClasspathToken::parse("!").is_err());
    assert!(ClasspathToken::parse("").is_err());
}

#[test]
fn test_display_round_trips_canonical_form() {
    for raw in [
        "${compile-output}",
        "${compile-output:app}/com/**",
        "!${test-compile-output:core}",
        "${runtime-dependencies}",
        "!/ws/out/test/**",
    ] {
        assert_eq!(ClasspathToken::parse(raw).unwrap().to_string(), raw);
    }
}

#[test]
fn test_migrate_bare_tokens() {
    assert_eq!(
        migrate("runtime-dependencies").as_deref(),
        Some("${runtime-dependencies}")
    );
    assert_eq!(
        migrate("compile-output:app").as_deref(),
        Some("${compile-output:app}")
    );
    assert_eq!(
        migrate("!test-compile-output").as_deref(),
        Some("!${test-compile-output}")
    );
    assert_eq!(migrate("${compile-output}"), None);
    assert_eq!(migrate("bin/**"), None);
}

#[test]
fn test_brace_glob_after_placeholder_stays_in_suffix() {
    let token = ClasspathToken::parse("${compile-output}/**/*.{class,properties}").unwrap();
    match &token {
        ClasspathToken::Output { template, .. } => {
            assert_eq!(template.scope, ClasspathScope::Runtime);
            assert_eq!(template.project, None);
            assert_eq!(template.suffix, "/**/*.{class,properties}");
        }
        other => panic!("unexpected token {:?}", other),
    }
    assert_eq!(token.to_string(), "${compile-output}/**/*.{class,properties}");

    assert!(ClasspathToken::parse("${test-compile-output:core}/{a,b}/**").is_ok());
}
