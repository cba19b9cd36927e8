use super::*;
use postgate::identity::{Identity, IdentityState};

fn ada() -> Identity {
    Identity {
        uid: "u-ada".to_owned(),
        display_name: Some("Ada".to_owned()),
        email: "ada@example.com".to_owned(),
        photo_url: None,
    }
}

#[test]
fn new_session_starts_signed_out_and_unbound() {
    let session = Session::new(ClientConfig::with_defaults("key"));
    assert!(!session.gate.is_ready());
    assert!(session.nav.view.get_untracked().show_auth_links);
    assert!(!session.nav.logout_bound.get_untracked());
}

#[test]
fn gate_notifications_reach_the_nav_signals() {
    let session = Session::new(ClientConfig::with_defaults("key"));
    session.gate.observe(IdentityState::Authenticated(ada()));

    let view = session.nav.view.get_untracked();
    assert!(!view.show_auth_links);
    assert_eq!(view.welcome.as_deref(), Some("Welcome, Ada"));
    assert!(session.nav.logout_bound.get_untracked());
}

#[test]
fn browser_session_talks_to_the_same_origin() {
    let session = Session::from_browser();
    assert_eq!(session.api.base_url(), "");
    assert_eq!(session.config.expired_redirect_delay, postgate::navigation::EXPIRED_REDIRECT_DELAY);
}
