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

#[test]
fn test_normalize_path_forms() {
    assert_eq!(normalize_path("/ws/out/"), "/ws/out");
    assert_eq!(normalize_path("/ws/./out/../bin"), "/ws/bin");
    assert_eq!(normalize_path("C:\\work\\app\\bin"), "C:/work/app/bin");
    assert_eq!(normalize_path("/../etc"), "/etc");
    assert_eq!(normalize_path("../lib"), "../lib");
    assert_eq!(normalize_path("a/.."), ".");
    assert_eq!(normalize_path("/"), "/");
    assert_eq!(normalize_path("/ws//out/**"), "/ws/out/**");
}

#[test]
fn test_literal_base() {
    assert_eq!(literal_base("/ws/out/**"), "/ws/out");
    assert_eq!(literal_base("/ws/out/com/*.class"), "/ws/out/com");
    assert_eq!(literal_base("/ws/out"), "/ws/out");
    assert_eq!(literal_base("/**"), "/");
    assert_eq!(literal_base("*.jar"), ".");
}

#[test]
fn test_directory_expands_to_all_files() {
    let temp = TempDir::new().unwrap();
    let a = touch(temp.path(), "out/com/A.class");
    let b = touch(temp.path(), "out/com/b/B.class");
    let root = format!("{}/out", root_of(&temp));

    let files = GlobExpander::new().expand(&[root]).unwrap();
    assert_eq!(files, vec![a, b]);
}

#[test]
fn test_negation_excludes_matches() {
    let temp = TempDir::new().unwrap();
    let kept = touch(temp.path(), "out/com/A.class");
    touch(temp.path(), "out/test/ATest.class");
    touch(temp.path(), "out/test/deep/BTest.class");
    let root = root_of(&temp);

    let files = GlobExpander::new()
        .expand(&[format!("{}/out/**", root), format!("!{}/out/test/**", root)])
        .unwrap();
    assert_eq!(files, vec![kept]);
}

#[test]
fn test_negated_directory_excludes_everything_below() {
    let temp = TempDir::new().unwrap();
    let kept = touch(temp.path(), "out/A.class");
    touch(temp.path(), "out/gen/G.class");
    let root = root_of(&temp);

    let files = GlobExpander::new()
        .expand(&[format!("{}/out", root), format!("!{}/out/gen", root)])
        .unwrap();
    assert_eq!(files, vec![kept]);
}

#[test]
fn test_overlapping_patterns_deduplicate() {
    let temp = TempDir::new().unwrap();
    let a = touch(temp.path(), "out/A.class");
    let root = root_of(&temp);

    let files = GlobExpander::new()
        .expand(&[
            format!("{}/out", root),
            format!("{}/out/*.class", root),
            a.clone(),
        ])
        .unwrap();
    assert_eq!(files, vec![a]);
}

#[test]
fn test_missing_paths_yield_nothing() {
    let temp = TempDir::new().unwrap();
    let root = root_of(&temp);

    let files = GlobExpander::new()
        .expand(&[format!("{}/nope/**", root), format!("{}/nope.jar", root)])
        .unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_hidden_files_skipped_unless_requested() {
    let temp = TempDir::new().unwrap();
    let visible = touch(temp.path(), "out/A.class");
    let hidden = touch(temp.path(), "out/.cache/state");
    let root = format!("{}/out", root_of(&temp));

    let files = GlobExpander::new().expand(&[root.clone()]).unwrap();
    assert_eq!(files, vec![visible.clone()]);

    let files = GlobExpander::new()
        .with_include_hidden(true)
        .expand(&[root])
        .unwrap();
    assert!(files.contains(&hidden));
    assert!(files.contains(&visible));
}

#[test]
fn test_single_star_does_not_cross_directories() {
    let temp = TempDir::new().unwrap();
    let top = touch(temp.path(), "lib/a.jar");
    touch(temp.path(), "lib/nested/b.jar");
    let root = root_of(&temp);

    let files = GlobExpander::new()
        .expand(&[format!("{}/lib/*.jar", root)])
        .unwrap();
    assert_eq!(files, vec![top]);
}

#[test]
fn test_invalid_glob_is_reported() {
    let err = GlobExpander::new().expand(&["/ws/out/[".to_string()]).unwrap_err();
    assert!(matches!(err, ExportError::InvalidToken { .. }));
}

#[test]
fn test_escaped_segments_are_literal() {
    assert_eq!(escape("/ws/proj[1]"), "/ws/proj[[]1[]]");
    assert_eq!(unescape("/ws/proj[[]1[]]").as_deref(), Some("/ws/proj[1]"));
    assert_eq!(unescape("/ws/out/**"), None);
    assert_eq!(unescape("/ws/[ab]"), None);
    assert_eq!(literal_base("/ws/proj[[]1[]]/out/**"), "/ws/proj[1]/out");
    assert_eq!(literal_base("/ws/a[{]b[}]"), "/ws/a{b}");
}

#[test]
fn test_escaped_directory_expands_to_its_files() {
    let temp = TempDir::new().unwrap();
    let a = touch(temp.path(), "proj[1]/out/com/A.class");
    let jar = touch(temp.path(), "lib*/dep.jar");
    let root = escape(&root_of(&temp));

    let files = GlobExpander::new()
        .expand(&[
            format!("{}/proj[[]1[]]/out", root),
            format!("{}/lib[*]/dep.jar", root),
        ])
        .unwrap();
    assert_eq!(files, vec![a, jar]);
}
