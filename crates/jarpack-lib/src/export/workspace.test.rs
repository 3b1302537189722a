use super::*;
use tempfile::TempDir;

fn mkdir(root: &Path, relative: &str) -> PathBuf {
    let dir = root.join(relative);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_discover_single_project_folder() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "pom.xml", "<project/>");

    let projects = discover_projects(temp.path()).unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].1, temp.path());
}

#[test]
fn test_discover_sub_projects_sorted() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "server/build.gradle", "");
    mkdir(temp.path(), "app/src/main/java");
    mkdir(temp.path(), "docs");
    mkdir(temp.path(), ".idea/src");

    let names: Vec<String> = discover_projects(temp.path())
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["app", "server"]);
}

#[test]
fn test_project_classpath_scopes() {
    let temp = TempDir::new().unwrap();
    let classes = mkdir(temp.path(), "target/classes");
    let test_classes = mkdir(temp.path(), "target/test-classes");
    let jar = write(temp.path(), "lib/dep.jar", "");
    write(temp.path(), "lib/readme.txt", "");

    let runtime = project_classpath(temp.path(), ClasspathScope::Runtime).unwrap();
    assert_eq!(
        runtime.classpaths,
        vec![
            normalize_path(&classes.to_string_lossy()),
            normalize_path(&jar.to_string_lossy()),
        ]
    );

    let test = project_classpath(temp.path(), ClasspathScope::Test).unwrap();
    assert_eq!(test.classpaths[0], normalize_path(&test_classes.to_string_lossy()));
    assert_eq!(test.classpaths.len(), 3);
}

#[test]
fn test_main_class_detection() {
    let source = "package com.acme;\n\npublic class App {\n    public static void main(String[] args) {}\n}\n";
    assert_eq!(
        main_class_of(Path::new("src/com/acme/App.java"), source).as_deref(),
        Some("com.acme.App")
    );

    let spaced = "public class Tool {\n  public static\n  void main (String... args) {}\n}";
    assert_eq!(main_class_of(Path::new("Tool.java"), spaced).as_deref(), Some("Tool"));

    assert_eq!(main_class_of(Path::new("Lib.java"), "class Lib { void run() {} }"), None);
}

#[test]
fn test_scan_main_classes() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "src/main/java/com/acme/Main.java",
        "package com.acme;\nclass Main { public static void main(String[] a) {} }",
    );
    write(
        temp.path(),
        "src/main/java/com/acme/Util.java",
        "package com.acme;\nclass Util {}",
    );
    write(
        temp.path(),
        "src/main/java/Cli.java",
        "class Cli { static void main(String[] a) {} }",
    );

    let names: Vec<String> = scan_main_classes(temp.path())
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Cli", "com.acme.Main"]);
}

#[tokio::test]
async fn test_build_workspace_requires_output() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "pom.xml", "<project/>");
    let support = WorkspaceBuildSupport::new(vec![temp.path().to_path_buf()]);

    assert!(support.is_server_ready().await.unwrap());
    assert!(!support.build_workspace().await.unwrap());

    mkdir(temp.path(), "target/classes");
    assert!(support.build_workspace().await.unwrap());
}

#[tokio::test]
async fn test_live_queries() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "pom.xml", "<project/>");
    mkdir(temp.path(), "target/classes");
    let support = WorkspaceBuildSupport::new(vec![temp.path().to_path_buf()]);
    let folder = WorkspaceFolder::from_path(temp.path());

    let projects = support.get_projects(&folder).await.unwrap();
    assert_eq!(projects.len(), 1);

    let classpath = support
        .get_classpaths(&projects[0], ClasspathScope::Runtime)
        .await
        .unwrap();
    assert_eq!(classpath.classpaths.len(), 1);
    assert!(classpath.classpaths[0].ends_with("target/classes"));

    assert!(support.get_main_classes(&folder).await.unwrap().is_empty());
}
