use super::*;
use std::fs;
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) -> String {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"x").unwrap();
    normalize_path(&path.to_string_lossy())
}

fn root_of(temp: &TempDir) -> String {
    normalize_path(&temp.path().to_string_lossy())
}

fn classpath(entries: &[String]) -> ClasspathResult {
    ClasspathResult {
        classpaths: entries.to_vec(),
        modulepaths: Vec::new(),
    }
}

/// Workspace with one project: `out` (runtime), `test-out` (test) and two jars
fn single_project(temp: &TempDir) -> ClasspathResolver {
    let root = root_of(temp);
    touch(temp.path(), "out/com/A.class");
    touch(temp.path(), "out/com/B.class");
    touch(temp.path(), "test-out/com/ATest.class");
    let lib = touch(temp.path(), "lib/lib.jar");
    let junit = touch(temp.path(), "lib/junit.jar");

    let mut resolver = ClasspathResolver::new(temp.path());
    resolver.add_project(
        "app",
        &classpath(&[format!("{}/out", root), lib.clone()]),
        &classpath(&[
            format!("{}/test-out", root),
            format!("{}/out", root),
            lib,
            junit,
        ]),
    );
    resolver
}

#[test]
fn test_add_project_partitions_jars() {
    let mut resolver = ClasspathResolver::new("/ws");
    resolver.add_project(
        "app",
        &ClasspathResult {
            classpaths: vec!["/ws/out".to_string(), "/m2/a.jar".to_string()],
            modulepaths: vec!["/m2/mod.jar".to_string()],
        },
        &classpath(&["/ws/test-out".to_string(), "/m2/junit.jar".to_string()]),
    );

    assert_eq!(resolver.projects()[0].runtime_roots, vec!["/ws/out"]);
    assert_eq!(resolver.projects()[0].test_roots, vec!["/ws/test-out"]);
    assert_eq!(
        resolver.dependencies(ClasspathScope::Runtime),
        &["/m2/a.jar".to_string(), "/m2/mod.jar".to_string()]
    );
    assert_eq!(
        resolver.dependencies(ClasspathScope::Test),
        &["/m2/junit.jar".to_string()]
    );
}

#[test]
fn test_substitute_output_and_literals() {
    let mut resolver = ClasspathResolver::new("/ws");
    resolver.add_project("app", &classpath(&["/ws/out".to_string()]), &ClasspathResult::default());
    resolver.add_project("lib", &classpath(&["/ws/lib/out".to_string()]), &ClasspathResult::default());

    let substituted = resolver
        .substitute(&[
            "${compile-output:lib}",
            "${compile-output}/com/**",
            "!resources/secret.txt",
        ])
        .unwrap();
    assert_eq!(
        substituted.patterns,
        vec![
            "/ws/lib/out",
            "/ws/out/com/**",
            "/ws/lib/out/com/**",
            "!/ws/resources/secret.txt",
        ]
    );
    assert!(substituted.dependencies.is_empty());
}

#[test]
fn test_unknown_project_contributes_nothing() {
    let mut resolver = ClasspathResolver::new("/ws");
    resolver.add_project("app", &classpath(&["/ws/out".to_string()]), &ClasspathResult::default());

    let substituted = resolver.substitute(&["${compile-output:missing}"]).unwrap();
    assert!(substituted.patterns.is_empty());
}

#[test]
fn test_substitute_rejects_bad_tokens() {
    let resolver = ClasspathResolver::new("/ws");
    let err = resolver.substitute(&["runtime-dependencies"]).unwrap_err();
    assert!(err.handler().is_some());
    assert!(resolver.substitute(&["${bogus}"]).is_err());
}

#[test]
fn test_destination_for() {
    assert_eq!(
        destination_for("/ws/out/com/A.class", "/ws/out").as_deref(),
        Some("com/A.class")
    );
    assert_eq!(
        destination_for("/ws/lib/readme.txt", "/ws/lib/readme.txt").as_deref(),
        Some("readme.txt")
    );
    assert_eq!(destination_for("/ws/outside/A.class", "/ws/out"), None);
    assert_eq!(destination_for("/ws/out/../A.class", "/ws/out"), None);
}

#[test]
fn test_resolve_maps_sources_under_roots() {
    let temp = TempDir::new().unwrap();
    let root = root_of(&temp);
    let resolver = single_project(&temp);

    let resolved = resolver
        .resolve(&["${compile-output}", "${runtime-dependencies}"])
        .unwrap();

    assert_eq!(
        resolved.sources,
        vec![
            ClasspathEntry {
                source: format!("{}/out/com/A.class", root),
                destination: "com/A.class".to_string(),
            },
            ClasspathEntry {
                source: format!("{}/out/com/B.class", root),
                destination: "com/B.class".to_string(),
            },
        ]
    );
    assert_eq!(resolved.dependencies, vec![format!("{}/lib/lib.jar", root)]);
}

#[test]
fn test_resolve_negation_removes_sources() {
    let temp = TempDir::new().unwrap();
    let resolver = single_project(&temp);

    let resolved = resolver
        .resolve(&["${compile-output}", "!${compile-output}/com/B.class"])
        .unwrap();

    let destinations: Vec<_> = resolved.sources.iter().map(|s| s.destination.as_str()).collect();
    assert_eq!(destinations, vec!["com/A.class"]);
}

#[test]
fn test_resolve_dedupes_destinations() {
    let temp = TempDir::new().unwrap();
    let resolver = single_project(&temp);

    // test scope includes `out` again alongside `test-out`
    let resolved = resolver
        .resolve(&[
            "${compile-output}",
            "${test-compile-output}",
            "${runtime-dependencies}",
            "${test-dependencies}",
        ])
        .unwrap();

    let destinations: Vec<_> = resolved.sources.iter().map(|s| s.destination.as_str()).collect();
    assert_eq!(destinations, vec!["com/A.class", "com/B.class", "com/ATest.class"]);
    assert_eq!(resolved.dependencies.len(), 2);
}

#[test]
fn test_resolve_prefers_deepest_root() {
    let temp = TempDir::new().unwrap();
    let root = root_of(&temp);
    touch(temp.path(), "out/com/A.class");
    touch(temp.path(), "out/nested/C.class");

    let resolver = ClasspathResolver::new(temp.path());
    let resolved = resolver.resolve(&["out", "out/nested"]).unwrap();

    let nested = resolved
        .sources
        .iter()
        .find(|s| s.source == format!("{}/out/nested/C.class", root))
        .unwrap();
    assert_eq!(nested.destination, "C.class");
}

#[test]
fn test_resolve_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let resolver = single_project(&temp);
    let elements = ["${compile-output}", "${runtime-dependencies}"];

    assert_eq!(
        resolver.resolve(&elements).unwrap(),
        resolver.resolve(&elements).unwrap()
    );
}

#[test]
fn test_resolve_brace_glob_after_placeholder() {
    let temp = TempDir::new().unwrap();
    let resolver = single_project(&temp);
    touch(temp.path(), "out/com/app.properties");
    touch(temp.path(), "out/com/notes.txt");

    let resolved = resolver
        .resolve(&["${compile-output}/**/*.{class,properties}"])
        .unwrap();

    let destinations: Vec<_> = resolved.sources.iter().map(|s| s.destination.as_str()).collect();
    assert_eq!(
        destinations,
        vec!["com/A.class", "com/B.class", "com/app.properties"]
    );
}

#[test]
fn test_resolve_roots_with_glob_characters_in_their_names() {
    let temp = TempDir::new().unwrap();
    let root = root_of(&temp);
    let class = touch(temp.path(), "proj[1]/out/com/A.class");
    let jar = touch(temp.path(), "libs{x}/dep*.jar");

    let mut resolver = ClasspathResolver::new(temp.path());
    resolver.add_project(
        "app",
        &classpath(&[format!("{}/proj[1]/out", root), jar.clone()]),
        &classpath(&[]),
    );

    let resolved = resolver
        .resolve(&["${compile-output}", "${runtime-dependencies}"])
        .unwrap();

    assert_eq!(
        resolved.sources,
        vec![ClasspathEntry {
            source: class,
            destination: "com/A.class".to_string(),
        }]
    );
    assert_eq!(resolved.dependencies, vec![jar]);
}

#[test]
fn test_relative_literal_under_workspace_root_with_brackets() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("demo[v2]");
    let class = touch(&workspace, "bin/com/A.class");

    let resolver = ClasspathResolver::new(&workspace);
    let resolved = resolver.resolve(&["bin"]).unwrap();

    assert_eq!(
        resolved.sources,
        vec![ClasspathEntry {
            source: class,
            destination: "com/A.class".to_string(),
        }]
    );
}
