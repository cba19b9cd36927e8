use super::*;

#[test]
fn user_lines_ignore_pending() {
    assert_eq!(speaker_class(Speaker::User, true), speaker_class(Speaker::User, false));
}

#[test]
fn pending_assistant_line_is_marked() {
    assert!(speaker_class(Speaker::Assistant, true).ends_with("chat-line--pending"));
    assert!(!speaker_class(Speaker::Assistant, false).contains("pending"));
}
