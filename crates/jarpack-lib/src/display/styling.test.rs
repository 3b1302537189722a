use super::*;

#[test]
fn test_plain_styling_has_no_escape_codes() {
    let styling = StyleManager::new(false);
    assert_eq!(styling.style_success("done"), "done");
    assert_eq!(styling.style_subtle("quiet"), "quiet");
    assert!(styling.format_error("broken").ends_with(" broken"));
}

#[test]
fn test_forced_styling_emits_escape_codes() {
    let styling = StyleManager::new(true);
    let styled = styling.style_error("broken");
    assert!(styled.contains("\u{1b}["));
    assert!(styled.contains("broken"));
}
