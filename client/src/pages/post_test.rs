use super::*;
use postgate::error::ValidationError;

#[test]
fn like_button_label_follows_membership() {
    assert_eq!(like_button_label(false), "Like");
    assert_eq!(like_button_label(true), "Unlike");
}

#[test]
fn busy_controls_stay_silent() {
    assert_eq!(failure_alert(&FlowError::Busy, LIKE_FAILED), None);
}

#[test]
fn request_failures_use_the_fallback_copy() {
    let error = FlowError::Request("boom".to_owned());
    assert_eq!(failure_alert(&error, COMMENT_FAILED).as_deref(), Some(COMMENT_FAILED));
}

#[test]
fn expired_sessions_use_the_post_page_copy() {
    assert_eq!(failure_alert(&FlowError::Expired, LIKE_FAILED).as_deref(), Some(POST_COPY.expired));
}

#[test]
fn empty_comment_reports_validation_text() {
    let error = FlowError::Validation(ValidationError::EmptyComment);
    assert_eq!(failure_alert(&error, COMMENT_FAILED).as_deref(), Some("Comment cannot be empty."));
}
