use super::*;
use crate::gate::IdentityGate;
use crate::navigation::{EXPIRED_REDIRECT_DELAY, Route};
use crate::test_helpers::{FakeProvider, MockApi, RecordingNav, RecordingNavigator, ann};

fn unlocked() -> ChatSession {
    let mut session = ChatSession::new();
    session.apply_ready(&IdentityState::Authenticated(ann()));
    session
}

#[test]
fn signed_out_keeps_overlay_and_input_locked() {
    let mut session = ChatSession::new();
    session.apply_ready(&IdentityState::Unauthenticated);
    assert!(session.overlay_visible());
    assert!(!session.input_enabled());
    assert_eq!(session.begin_send("hi"), Err(FlowError::SignInRequired));
}

#[test]
fn input_disabled_before_request_and_restored_on_completion() {
    let mut session = unlocked();
    assert!(session.input_enabled());

    assert_eq!(session.begin_send("  hello ").unwrap(), "hello");
    assert!(!session.input_enabled());
    assert_eq!(session.begin_send("again"), Err(FlowError::Busy));
    assert_eq!(session.lines().len(), 2);
    assert!(session.lines()[1].pending);

    session.finish_send(&PageState::Loaded(ChatReply { reply: "hi!".to_owned() }));

    assert!(session.input_enabled());
    assert_eq!(
        session.lines(),
        &[
            ChatLine { speaker: Speaker::User, text: "hello".to_owned(), pending: false },
            ChatLine { speaker: Speaker::Assistant, text: "hi!".to_owned(), pending: false },
        ]
    );
}

#[test]
fn blank_message_is_not_sent() {
    let mut session = unlocked();
    assert_eq!(session.begin_send(" \t"), Err(FlowError::Validation(ValidationError::EmptyMessage)));
    assert!(session.lines().is_empty());
    assert!(session.input_enabled());
}

#[test]
fn failures_replace_placeholder_with_copy() {
    let mut session = unlocked();
    session.begin_send("one").unwrap();
    session.finish_send(&PageState::Error("boom".to_owned()));
    session.begin_send("two").unwrap();
    session.finish_send(&PageState::Expired);

    let texts: Vec<&str> = session.lines().iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["one", CHAT_FAILED, "two", CHAT_EXPIRED]);
}

#[tokio::test]
async fn send_runs_gated_request() {
    let provider = FakeProvider::new(None);
    let gate = IdentityGate::connect(&provider, RecordingNav::shared());
    let api = MockApi::default();
    provider.emit(IdentityState::Authenticated(ann()));
    let loader = GatedPageLoader::new(&gate, &provider, &api);
    let mut session = unlocked();

    let run = session.send(&loader, "hello").await.unwrap();

    assert_eq!(run.state, PageState::Loaded(ChatReply { reply: "hello there".to_owned() }));
    assert_eq!(api.calls(), vec!["POST /api/chat"]);
    assert_eq!(session.lines().last().map(|l| l.text.as_str()), Some("hello there"));
}

#[tokio::test]
async fn expired_send_schedules_login() {
    let provider = FakeProvider::new(None);
    let gate = IdentityGate::connect(&provider, RecordingNav::shared());
    let api = MockApi::default();
    *api.chat.lock().unwrap() = Err(ApiError::Unauthorized);
    let navigator = RecordingNavigator::default();
    provider.emit(IdentityState::Authenticated(ann()));
    let loader = GatedPageLoader::new(&gate, &provider, &api).with_navigator(&navigator, EXPIRED_REDIRECT_DELAY);
    let mut session = unlocked();

    session.send(&loader, "hello").await.unwrap();

    assert_eq!(navigator.visits(), vec![(Route::Login, Some(EXPIRED_REDIRECT_DELAY))]);
    assert!(session.input_enabled());
}
