use std::sync::atomic::Ordering;

use super::*;
use crate::identity::ProviderError;
use crate::test_helpers::{FakeProvider, ann, bob};

#[test]
fn bearer_header_and_redacted_debug() {
    let token = BearerToken::new("abc.def");
    assert_eq!(token.header_value(), "Bearer abc.def");
    assert_eq!(token.as_str(), "abc.def");
    assert!(!format!("{token:?}").contains("abc"));
}

#[tokio::test]
async fn no_identity_yields_none_without_calling_provider() {
    let provider = FakeProvider::new(None);
    let tokens = TokenAccessor::new(&provider);
    assert_eq!(tokens.get_token(false).await, None);
    assert_eq!(provider.token_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn signed_in_yields_token() {
    let provider = FakeProvider::new(Some(ann()));
    let token = TokenAccessor::new(&provider).get_token(false).await;
    assert_eq!(token, Some(BearerToken::new("token-1")));
}

#[tokio::test]
async fn provider_failure_yields_none() {
    let provider = FakeProvider::new(Some(ann()));
    provider.set_token(Err(ProviderError::SessionRevoked("TOKEN_EXPIRED".to_owned())));
    assert_eq!(TokenAccessor::new(&provider).get_token(false).await, None);
}

#[tokio::test]
async fn force_refresh_is_forwarded() {
    let provider = FakeProvider::new(Some(ann()));
    let _ = TokenAccessor::new(&provider).get_token(true).await;
    assert_eq!(provider.forced_token_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn token_for_refuses_other_identity() {
    let provider = FakeProvider::new(Some(bob()));
    let tokens = TokenAccessor::new(&provider);
    assert_eq!(tokens.token_for(&ann(), false).await, None);
    assert_eq!(provider.token_calls.load(Ordering::SeqCst), 0);
    assert!(tokens.token_for(&bob(), false).await.is_some());
}

#[tokio::test]
async fn token_for_refuses_after_sign_out() {
    let provider = FakeProvider::new(None);
    assert_eq!(TokenAccessor::new(&provider).token_for(&ann(), false).await, None);
}
