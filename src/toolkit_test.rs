use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use super::*;
use crate::gate::IdentityGate;
use crate::hints::MemoryStore;
use crate::test_helpers::RecordingNav;

// =============================================================================
// Fakes
// =============================================================================

#[derive(Default)]
struct FakeTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, String>>>,
    requests: Mutex<Vec<(String, String, String)>>,
}

impl FakeTransport {
    fn reply(&self, status: u16, body: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(TransportResponse { status, body: body.to_string() }));
    }

    fn fail(&self, message: &str) {
        self.responses.lock().unwrap().push_back(Err(message.to_owned()));
    }

    fn requests(&self) -> Vec<(String, String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl ToolkitTransport for FakeTransport {
    async fn post(&self, url: &str, content_type: &str, body: String) -> Result<TransportResponse, String> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_owned(), content_type.to_owned(), body));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted response".to_owned()))
    }
}

struct FakeClock(AtomicU64);

impl FakeClock {
    fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now_unix_secs(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

type Provider = ToolkitProvider<FakeTransport, FakeClock>;

fn endpoints() -> ToolkitEndpoints {
    ToolkitEndpoints {
        identity_base_url: "https://id.test/v1/".to_owned(),
        token_base_url: "https://token.test/v1".to_owned(),
        api_key: "k123".to_owned(),
    }
}

fn provider_with(store: Arc<MemoryStore>) -> Provider {
    ToolkitProvider::new(endpoints(), FakeTransport::default(), FakeClock(AtomicU64::new(1_000)), store)
}

fn recorder(provider: &Provider) -> Arc<Mutex<Vec<IdentityState>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    provider.subscribe(Arc::new(move |state| sink.lock().unwrap().push(state)));
    seen
}

fn account(uid: &str, email: &str, display_name: &str) -> serde_json::Value {
    serde_json::json!({
        "localId": uid,
        "email": email,
        "displayName": display_name,
        "idToken": format!("id-{uid}"),
        "refreshToken": format!("refresh-{uid}"),
        "expiresIn": "3600",
    })
}

fn stored(uid: &str) -> String {
    serde_json::json!({
        "identity": { "uid": uid, "display_name": "Ann", "email": "ann@example.com", "photo_url": null },
        "refresh_token": "refresh/+=",
    })
    .to_string()
}

// =============================================================================
// Endpoints and error mapping
// =============================================================================

#[test]
fn endpoint_urls() {
    let e = endpoints();
    assert_eq!(e.sign_in_url(), "https://id.test/v1/accounts:signInWithPassword?key=k123");
    assert_eq!(e.sign_up_url(), "https://id.test/v1/accounts:signUp?key=k123");
    assert_eq!(e.update_url(), "https://id.test/v1/accounts:update?key=k123");
    assert_eq!(e.refresh_url(), "https://token.test/v1/token?key=k123");
}

#[test]
fn api_key_is_query_encoded() {
    let e = ToolkitEndpoints { api_key: "k 1&x=2".to_owned(), ..endpoints() };
    assert_eq!(e.sign_in_url(), "https://id.test/v1/accounts:signInWithPassword?key=k+1%26x%3D2");
    assert_eq!(e.refresh_url(), "https://token.test/v1/token?key=k+1%26x%3D2");
}

#[test]
fn error_codes_map_to_provider_errors() {
    assert_eq!(map_error_code("INVALID_LOGIN_CREDENTIALS"), ProviderError::InvalidCredential);
    assert_eq!(map_error_code("EMAIL_NOT_FOUND"), ProviderError::InvalidCredential);
    assert_eq!(map_error_code("EMAIL_EXISTS"), ProviderError::EmailInUse);
    assert_eq!(
        map_error_code("WEAK_PASSWORD : Password should be at least 6 characters"),
        ProviderError::WeakPassword
    );
    assert_eq!(map_error_code("TOKEN_EXPIRED"), ProviderError::SessionRevoked("TOKEN_EXPIRED".to_owned()));
    assert_eq!(map_error_code("QUOTA_EXCEEDED"), ProviderError::Other { code: "QUOTA_EXCEEDED".to_owned() });
}

// =============================================================================
// Start-up
// =============================================================================

#[test]
fn start_without_session_notifies_signed_out_once() {
    let provider = provider_with(Arc::new(MemoryStore::new()));
    let seen = recorder(&provider);

    provider.start();
    provider.start();

    assert_eq!(*seen.lock().unwrap(), vec![IdentityState::Unauthenticated]);
}

#[test]
fn late_subscriber_gets_current_state_immediately() {
    let store = Arc::new(MemoryStore::new());
    store.set(SESSION_KEY, &stored("uid-ann"));
    let provider = provider_with(store);
    provider.start();

    let seen = recorder(&provider);

    let states = seen.lock().unwrap().clone();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].identity().map(|i| i.uid.as_str()), Some("uid-ann"));
}

#[test]
fn unreadable_session_is_discarded() {
    let store = Arc::new(MemoryStore::new());
    store.set(SESSION_KEY, "{not json");
    let provider = provider_with(Arc::clone(&store));

    provider.start();

    assert_eq!(provider.current_identity(), None);
    assert!(store.is_empty());
}

#[tokio::test]
async fn gate_resolves_from_restored_session() {
    let store = Arc::new(MemoryStore::new());
    store.set(SESSION_KEY, &stored("uid-ann"));
    let provider = provider_with(store);
    let gate = IdentityGate::connect(&provider, RecordingNav::shared());

    provider.start();

    assert!(gate.on_ready().await.is_authenticated());
}

// =============================================================================
// Password flows
// =============================================================================

#[tokio::test]
async fn sign_in_posts_json_and_persists_session() {
    let store = Arc::new(MemoryStore::new());
    let provider = provider_with(Arc::clone(&store));
    provider.start();
    let seen = recorder(&provider);
    provider.transport.reply(200, account("uid-ann", "ann@example.com", "Ann"));

    let identity = provider.sign_in("ann@example.com", "secret").await.unwrap();

    assert_eq!(identity.uid, "uid-ann");
    assert_eq!(identity.name(), "Ann");
    let (url, content_type, body) = provider.transport.requests()[0].clone();
    assert_eq!(url, "https://id.test/v1/accounts:signInWithPassword?key=k123");
    assert_eq!(content_type, JSON_CONTENT_TYPE);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["returnSecureToken"], true);
    assert_eq!(body["email"], "ann@example.com");
    assert!(store.get(SESSION_KEY).unwrap().contains("refresh-uid-ann"));
    assert_eq!(seen.lock().unwrap().last().map(IdentityState::is_authenticated), Some(true));
}

#[tokio::test]
async fn rejected_sign_in_maps_envelope() {
    let provider = provider_with(Arc::new(MemoryStore::new()));
    provider.transport.reply(
        400,
        serde_json::json!({ "error": { "code": 400, "message": "INVALID_LOGIN_CREDENTIALS" } }),
    );

    let error = provider.sign_in("ann@example.com", "wrong").await.unwrap_err();

    assert_eq!(error, ProviderError::InvalidCredential);
    assert_eq!(provider.current_identity(), None);
}

#[tokio::test]
async fn transport_failure_is_network_error() {
    let provider = provider_with(Arc::new(MemoryStore::new()));
    provider.transport.fail("connection refused");

    let error = provider.sign_in("a@b.c", "x").await.unwrap_err();

    assert_eq!(error, ProviderError::Network("connection refused".to_owned()));
}

#[tokio::test]
async fn sign_up_then_display_name_update() {
    let provider = provider_with(Arc::new(MemoryStore::new()));
    provider.transport.reply(
        200,
        serde_json::json!({
            "localId": "uid-new", "email": "new@example.com",
            "idToken": "id-new", "refreshToken": "refresh-new", "expiresIn": "3600",
        }),
    );
    provider.transport.reply(200, serde_json::json!({ "localId": "uid-new", "email": "new@example.com" }));

    let created = provider.create_account("new@example.com", "secret1").await.unwrap();
    assert_eq!(created.display_name, None);
    let updated = provider.update_display_name("Nick").await.unwrap();

    assert_eq!(updated.display_name.as_deref(), Some("Nick"));
    assert_eq!(provider.current_identity(), Some(updated));
    let requests = provider.transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].0.ends_with("accounts:update?key=k123"));
    let body: serde_json::Value = serde_json::from_str(&requests[1].2).unwrap();
    assert_eq!(body["idToken"], "id-new");
    assert_eq!(body["displayName"], "Nick");
}

#[tokio::test]
async fn sign_out_clears_store_and_notifies() {
    let store = Arc::new(MemoryStore::new());
    store.set(SESSION_KEY, &stored("uid-ann"));
    let provider = provider_with(Arc::clone(&store));
    provider.start();
    let seen = recorder(&provider);

    provider.sign_out().await.unwrap();

    assert!(store.is_empty());
    assert_eq!(seen.lock().unwrap().last(), Some(&IdentityState::Unauthenticated));
}

// =============================================================================
// Tokens
// =============================================================================

#[tokio::test]
async fn id_token_requires_session() {
    let provider = provider_with(Arc::new(MemoryStore::new()));
    assert_eq!(provider.id_token(false).await, Err(ProviderError::NotSignedIn));
}

#[tokio::test]
async fn cached_token_reused_until_refresh_margin() {
    let provider = provider_with(Arc::new(MemoryStore::new()));
    provider.transport.reply(200, account("uid-ann", "ann@example.com", "Ann"));
    provider.sign_in("ann@example.com", "secret").await.unwrap();

    assert_eq!(provider.id_token(false).await.unwrap(), "id-uid-ann");
    assert_eq!(provider.transport.requests().len(), 1);

    provider.clock.advance(3600 - 60);
    provider.transport.reply(
        200,
        serde_json::json!({ "id_token": "id-2", "refresh_token": "refresh-2", "expires_in": "3600" }),
    );
    assert_eq!(provider.id_token(false).await.unwrap(), "id-2");
    assert_eq!(provider.transport.requests().len(), 2);
}

#[tokio::test]
async fn forced_refresh_uses_form_encoded_refresh_token() {
    let store = Arc::new(MemoryStore::new());
    store.set(SESSION_KEY, &stored("uid-ann"));
    let provider = provider_with(Arc::clone(&store));
    provider.start();
    provider.transport.reply(
        200,
        serde_json::json!({ "id_token": "id-2", "refresh_token": "refresh-2", "expires_in": "3600" }),
    );

    assert_eq!(provider.id_token(true).await.unwrap(), "id-2");

    let (url, content_type, body) = provider.transport.requests()[0].clone();
    assert_eq!(url, "https://token.test/v1/token?key=k123");
    assert_eq!(content_type, FORM_CONTENT_TYPE);
    assert_eq!(body, "grant_type=refresh_token&refresh_token=refresh%2F%2B%3D");
    assert!(store.get(SESSION_KEY).unwrap().contains("refresh-2"));
}

#[tokio::test]
async fn revoked_refresh_signs_out_locally() {
    let store = Arc::new(MemoryStore::new());
    store.set(SESSION_KEY, &stored("uid-ann"));
    let provider = provider_with(Arc::clone(&store));
    provider.start();
    let seen = recorder(&provider);
    provider.transport.reply(
        400,
        serde_json::json!({ "error": { "code": 400, "message": "TOKEN_EXPIRED", "status": "INVALID_ARGUMENT" } }),
    );

    let error = provider.id_token(false).await.unwrap_err();

    assert_eq!(error, ProviderError::SessionRevoked("TOKEN_EXPIRED".to_owned()));
    assert_eq!(provider.current_identity(), None);
    assert!(store.is_empty());
    assert_eq!(seen.lock().unwrap().last(), Some(&IdentityState::Unauthenticated));
}

#[tokio::test]
async fn stale_revoked_refresh_keeps_the_newer_session() {
    let store = Arc::new(MemoryStore::new());
    let provider = provider_with(Arc::clone(&store));
    provider.start();
    provider.transport.reply(200, account("uid-bob", "bob@example.com", "Bob"));
    provider.sign_in("bob@example.com", "secret").await.unwrap();
    let seen = recorder(&provider);
    provider.transport.reply(
        400,
        serde_json::json!({ "error": { "code": 400, "message": "TOKEN_EXPIRED" } }),
    );
    let stale = Session {
        identity: Identity {
            uid: "uid-ann".to_owned(),
            display_name: None,
            email: "ann@example.com".to_owned(),
            photo_url: None,
        },
        refresh_token: "refresh-old".to_owned(),
        id_token: None,
    };

    let error = provider.refresh(stale).await.unwrap_err();

    assert_eq!(error, ProviderError::SessionRevoked("TOKEN_EXPIRED".to_owned()));
    assert_eq!(provider.current_identity().map(|i| i.uid), Some("uid-bob".to_owned()));
    assert!(store.get(SESSION_KEY).unwrap().contains("uid-bob"));
    assert!(!seen.lock().unwrap().contains(&IdentityState::Unauthenticated));
}

#[tokio::test]
async fn huge_token_lifetime_saturates() {
    let provider = provider_with(Arc::new(MemoryStore::new()));
    provider.start();
    let mut reply = account("uid-ann", "ann@example.com", "Ann");
    reply["expiresIn"] = serde_json::json!(u64::MAX.to_string());
    provider.transport.reply(200, reply);

    provider.sign_in("ann@example.com", "secret").await.unwrap();
    provider.clock.advance(86_400);

    assert_eq!(provider.id_token(false).await.unwrap(), "id-uid-ann");
    assert_eq!(provider.transport.requests().len(), 1);
}
