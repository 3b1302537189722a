use super::*;

#[test]
fn test_find_inserted_root_returns_its_value() {
    let mut trie = PathTrie::new();
    trie.insert("/ws/app/target/classes");
    trie.insert("/ws/lib/bin");

    let node = trie.find("/ws/app/target/classes").unwrap();
    assert_eq!(node.value(), Some("/ws/app/target/classes"));
    assert_eq!(node.key(), "classes");
    assert_eq!(trie.find("/ws/lib/bin").unwrap().value(), Some("/ws/lib/bin"));
}

#[test]
fn test_find_partial_prefix_is_none() {
    let mut trie = PathTrie::new();
    trie.insert("/ws/app/target/classes");

    assert!(trie.find("/ws/app/target/test-classes").is_none());
    assert!(trie.find("/ws/other").is_none());
}

#[test]
fn test_intermediate_nodes_have_no_value() {
    let mut trie = PathTrie::new();
    trie.insert("/ws/app/target/classes");

    let node = trie.find("/ws/app").unwrap();
    assert_eq!(node.value(), None);
    assert!(node.child("target").is_some());
}

#[test]
fn test_nested_roots_both_discoverable() {
    let mut trie = PathTrie::new();
    trie.insert("/ws/out");
    trie.insert("/ws/out/generated");

    assert_eq!(trie.find("/ws/out").unwrap().value(), Some("/ws/out"));
    assert_eq!(
        trie.find("/ws/out/generated").unwrap().value(),
        Some("/ws/out/generated")
    );
    assert_eq!(trie.len(), 2);
}

#[test]
fn test_reinsert_overwrites_without_growing() {
    let mut trie = PathTrie::new();
    trie.insert("/ws/out");
    trie.insert("/ws/out/");
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.find("/ws/out").unwrap().value(), Some("/ws/out/"));
}

#[test]
fn test_longest_prefix_prefers_deepest_root() {
    let trie: PathTrie = ["/ws/out", "/ws/out/generated"].into_iter().collect();

    assert_eq!(trie.longest_prefix("/ws/out/com/A.class"), Some("/ws/out"));
    assert_eq!(
        trie.longest_prefix("/ws/out/generated/com/B.class"),
        Some("/ws/out/generated")
    );
    assert_eq!(trie.longest_prefix("/ws/src/Main.java"), None);
}

#[test]
fn test_segment_match_is_case_sensitive() {
    let trie: PathTrie = ["/ws/Out"].into_iter().collect();
    assert!(trie.find("/ws/out").is_none());
    assert_eq!(trie.longest_prefix("/ws/out/A.class"), None);
}

#[test]
fn test_windows_style_normalized_roots() {
    let trie: PathTrie = ["C:/work/app/bin"].into_iter().collect();
    assert_eq!(
        trie.longest_prefix("C:/work/app/bin/pkg/Main.class"),
        Some("C:/work/app/bin")
    );
}

#[test]
fn test_empty_trie() {
    let trie = PathTrie::new();
    assert!(trie.is_empty());
    assert_eq!(trie.longest_prefix("/anything"), None);
    assert!(trie.find("/").is_some());
}
