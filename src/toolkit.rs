//! Identity-toolkit REST provider.
//!
//! SYSTEM CONTEXT
//! ==============
//! Implements [`IdentityProvider`] against the identity-toolkit password
//! endpoints and the secure-token refresh endpoint:
//!
//! ```text
//! sign_in        ─▶ POST {identity}/accounts:signInWithPassword?key=…
//! create_account ─▶ POST {identity}/accounts:signUp?key=…
//! display name   ─▶ POST {identity}/accounts:update?key=…
//! id_token       ─▶ POST {token}/token?key=…   (form: grant_type=refresh_token)
//! ```
//!
//! The refresh token and profile are persisted under [`SESSION_KEY`] so the
//! session survives reloads; [`ToolkitProvider::start`] restores it and emits
//! the first identity notification.
//!
//! DESIGN
//! ======
//! HTTP and time are injected ([`ToolkitTransport`], [`Clock`]) so the same
//! provider runs in the browser (gloo-net, `Date.now`) and the CLI (reqwest,
//! `SystemTime`). No lock is held across an await; listeners are called with
//! no lock held.
//!
//! ERROR HANDLING
//! ==============
//! Error envelopes map to [`ProviderError`] by their message code. A refresh
//! rejected as revoked or expired signs the user out locally and notifies
//! listeners, so pages fall back to the signed-out state.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::hints::KeyValueStore;
use crate::identity::{Identity, IdentityListener, IdentityProvider, IdentityState, ProviderError};

pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_TOKEN_BASE_URL: &str = "https://securetoken.googleapis.com/v1";

/// Key/value slot holding the persisted session.
pub const SESSION_KEY: &str = "postgate.session";

/// A cached id token is refreshed this long before it expires.
pub const REFRESH_MARGIN: Duration = Duration::from_secs(60);

const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

// =============================================================================
// SEAMS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolkitEndpoints {
    pub identity_base_url: String,
    pub token_base_url: String,
    pub api_key: String,
}

impl ToolkitEndpoints {
    #[must_use]
    pub fn with_defaults(api_key: impl Into<String>) -> Self {
        Self {
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_owned(),
            token_base_url: DEFAULT_TOKEN_BASE_URL.to_owned(),
            api_key: api_key.into(),
        }
    }

    fn key_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new()).append_pair("key", &self.api_key).finish()
    }

    fn identity_url(&self, method: &str) -> String {
        format!("{}/accounts:{method}?{}", self.identity_base_url.trim_end_matches('/'), self.key_query())
    }

    #[must_use]
    pub fn sign_in_url(&self) -> String {
        self.identity_url("signInWithPassword")
    }

    #[must_use]
    pub fn sign_up_url(&self) -> String {
        self.identity_url("signUp")
    }

    #[must_use]
    pub fn update_url(&self) -> String {
        self.identity_url("update")
    }

    #[must_use]
    pub fn refresh_url(&self) -> String {
        format!("{}/token?{}", self.token_base_url.trim_end_matches('/'), self.key_query())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Minimal HTTP POST used by the provider.
#[async_trait::async_trait(?Send)]
pub trait ToolkitTransport: Send + Sync {
    /// # Errors
    ///
    /// A description of the transport failure (DNS, TLS, timeout, ...).
    /// Non-2xx responses are not errors here.
    async fn post(&self, url: &str, content_type: &str, body: String) -> Result<TransportResponse, String>;
}

pub trait Clock: Send + Sync {
    fn now_unix_secs(&self) -> u64;
}

/// Wall clock for native targets.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_secs(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
    }
}

// =============================================================================
// WIRE
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// Map an error-envelope message such as `"WEAK_PASSWORD : Password should be
/// at least 6 characters"` to a [`ProviderError`].
#[must_use]
pub fn map_error_code(message: &str) -> ProviderError {
    let code = message.split([' ', ':']).next().unwrap_or_default();
    match code {
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" => ProviderError::InvalidCredential,
        "EMAIL_EXISTS" => ProviderError::EmailInUse,
        "INVALID_EMAIL" | "MISSING_EMAIL" => ProviderError::InvalidEmail,
        "WEAK_PASSWORD" => ProviderError::WeakPassword,
        "TOKEN_EXPIRED" | "USER_DISABLED" | "USER_NOT_FOUND" | "INVALID_REFRESH_TOKEN" | "INVALID_ID_TOKEN" => {
            ProviderError::SessionRevoked(code.to_owned())
        }
        _ => ProviderError::Other { code: code.to_owned() },
    }
}

fn error_from_response(response: &TransportResponse) -> ProviderError {
    match serde_json::from_str::<ErrorEnvelope>(&response.body) {
        Ok(envelope) if !envelope.error.message.is_empty() => map_error_code(&envelope.error.message),
        _ => ProviderError::Other { code: format!("HTTP_{}", response.status) },
    }
}

fn lifetime_secs(expires_in: Option<&str>) -> u64 {
    expires_in
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
}

// =============================================================================
// SESSION
// =============================================================================

/// What survives a reload.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredSession {
    identity: Identity,
    refresh_token: String,
}

#[derive(Clone, Debug)]
struct CachedToken {
    value: String,
    expires_at: u64,
}

#[derive(Clone, Debug)]
struct Session {
    identity: Identity,
    refresh_token: String,
    id_token: Option<CachedToken>,
}

#[derive(Default)]
struct Inner {
    session: Option<Session>,
    started: bool,
    listeners: Vec<IdentityListener>,
}

pub struct ToolkitProvider<T, C = SystemClock> {
    endpoints: ToolkitEndpoints,
    transport: T,
    clock: C,
    store: Arc<dyn KeyValueStore>,
    inner: Mutex<Inner>,
}

impl<T: ToolkitTransport, C: Clock> ToolkitProvider<T, C> {
    #[must_use]
    pub fn new(endpoints: ToolkitEndpoints, transport: T, clock: C, store: Arc<dyn KeyValueStore>) -> Self {
        Self { endpoints, transport, clock, store, inner: Mutex::new(Inner::default()) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restore any persisted session and emit the first notification.
    /// Later calls are ignored.
    pub fn start(&self) {
        {
            let mut inner = self.lock();
            if inner.started {
                return;
            }
            inner.started = true;
            inner.session = self.restore();
        }
        self.notify();
    }

    fn restore(&self) -> Option<Session> {
        let raw = self.store.get(SESSION_KEY)?;
        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(stored) => {
                log::debug!("restored session for {}", stored.identity.uid);
                Some(Session { identity: stored.identity, refresh_token: stored.refresh_token, id_token: None })
            }
            Err(e) => {
                log::warn!("discarding unreadable stored session: {e}");
                self.store.remove(SESSION_KEY);
                None
            }
        }
    }

    fn persist(&self, session: Option<&Session>) {
        let Some(session) = session else {
            self.store.remove(SESSION_KEY);
            return;
        };
        let stored = StoredSession { identity: session.identity.clone(), refresh_token: session.refresh_token.clone() };
        match serde_json::to_string(&stored) {
            Ok(raw) => self.store.set(SESSION_KEY, &raw),
            Err(e) => log::error!("failed to persist session: {e}"),
        }
    }

    fn state(&self) -> IdentityState {
        self.lock().session.as_ref().map(|s| s.identity.clone()).into()
    }

    fn notify(&self) {
        let (state, listeners) = {
            let inner = self.lock();
            let state: IdentityState = inner.session.as_ref().map(|s| s.identity.clone()).into();
            (state, inner.listeners.clone())
        };
        for listener in listeners {
            listener(state.clone());
        }
    }

    fn is_current_uid(&self, uid: &str) -> bool {
        self.lock().session.as_ref().is_some_and(|current| current.identity.uid == uid)
    }

    fn replace_session(&self, session: Option<Session>) {
        self.persist(session.as_ref());
        self.lock().session = session;
        self.notify();
    }

    async fn call<R: DeserializeOwned>(&self, url: &str, content_type: &str, body: String) -> Result<R, ProviderError> {
        let response = self
            .transport
            .post(url, content_type, body)
            .await
            .map_err(ProviderError::Network)?;
        if !(200..300).contains(&response.status) {
            return Err(error_from_response(&response));
        }
        serde_json::from_str(&response.body).map_err(|e| ProviderError::Network(format!("unexpected response: {e}")))
    }

    async fn password_call(&self, url: &str, email: &str, password: &str) -> Result<Identity, ProviderError> {
        let body = serde_json::to_string(&PasswordRequest { email, password, return_secure_token: true })
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let account: AccountResponse = self.call(url, JSON_CONTENT_TYPE, body).await?;
        let session = self.session_from_account(account, None)?;
        let identity = session.identity.clone();
        self.replace_session(Some(session));
        Ok(identity)
    }

    fn session_from_account(&self, account: AccountResponse, previous: Option<&Session>) -> Result<Session, ProviderError> {
        let refresh_token = account
            .refresh_token
            .or_else(|| previous.map(|p| p.refresh_token.clone()))
            .ok_or_else(|| ProviderError::Other { code: "MISSING_REFRESH_TOKEN".to_owned() })?;
        let lifetime = lifetime_secs(account.expires_in.as_deref());
        let id_token = account
            .id_token
            .map(|value| CachedToken { value, expires_at: self.clock.now_unix_secs().saturating_add(lifetime) })
            .or_else(|| previous.and_then(|p| p.id_token.clone()));
        let identity = Identity {
            uid: account.local_id,
            display_name: account.display_name.filter(|n| !n.is_empty()),
            email: account.email.or_else(|| previous.map(|p| p.identity.email.clone())).unwrap_or_default(),
            photo_url: account.photo_url.filter(|u| !u.is_empty()),
        };
        Ok(Session { identity, refresh_token, id_token })
    }

    async fn refresh(&self, session: Session) -> Result<String, ProviderError> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "refresh_token")
            .append_pair("refresh_token", &session.refresh_token)
            .finish();
        let url = self.endpoints.refresh_url();
        let refreshed: RefreshResponse = match self.call(&url, FORM_CONTENT_TYPE, body).await {
            Ok(refreshed) => refreshed,
            Err(ProviderError::SessionRevoked(code)) => {
                if self.is_current_uid(&session.identity.uid) {
                    log::warn!("session for {} revoked ({code}); signing out locally", session.identity.uid);
                    self.replace_session(None);
                } else {
                    log::debug!("stale refresh for {} revoked ({code}); session already replaced", session.identity.uid);
                }
                return Err(ProviderError::SessionRevoked(code));
            }
            Err(e) => return Err(e),
        };

        let expires_at = self.clock.now_unix_secs().saturating_add(lifetime_secs(refreshed.expires_in.as_deref()));
        let token = refreshed.id_token.clone();
        let updated = {
            let mut inner = self.lock();
            match inner.session.as_mut() {
                Some(current) if current.identity.uid == session.identity.uid => {
                    current.refresh_token = refreshed.refresh_token;
                    current.id_token = Some(CachedToken { value: refreshed.id_token, expires_at });
                    Some(current.clone())
                }
                _ => None,
            }
        };
        match updated {
            Some(current) => {
                self.persist(Some(&current));
                Ok(token)
            }
            None => Err(ProviderError::NotSignedIn),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl<T: ToolkitTransport, C: Clock> IdentityProvider for ToolkitProvider<T, C> {
    fn subscribe(&self, listener: IdentityListener) {
        let started = {
            let mut inner = self.lock();
            inner.listeners.push(Arc::clone(&listener));
            inner.started
        };
        if started {
            listener(self.state());
        }
    }

    fn current_identity(&self) -> Option<Identity> {
        self.lock().session.as_ref().map(|s| s.identity.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        self.password_call(&self.endpoints.sign_in_url(), email, password).await
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        self.password_call(&self.endpoints.sign_up_url(), email, password).await
    }

    async fn update_display_name(&self, display_name: &str) -> Result<Identity, ProviderError> {
        let id_token = self.id_token(false).await?;
        let body = serde_json::to_string(&UpdateRequest { id_token: &id_token, display_name, return_secure_token: true })
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let account: AccountResponse = self.call(&self.endpoints.update_url(), JSON_CONTENT_TYPE, body).await?;

        let previous = self.lock().session.clone().ok_or(ProviderError::NotSignedIn)?;
        let mut session = self.session_from_account(account, Some(&previous))?;
        if session.identity.display_name.is_none() {
            session.identity.display_name = Some(display_name.to_owned());
        }
        if session.identity.photo_url.is_none() {
            session.identity.photo_url.clone_from(&previous.identity.photo_url);
        }
        let identity = session.identity.clone();
        self.replace_session(Some(session));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        if let Some(identity) = self.current_identity() {
            log::info!("signing out {}", identity.uid);
        }
        self.replace_session(None);
        Ok(())
    }

    async fn id_token(&self, force_refresh: bool) -> Result<String, ProviderError> {
        let session = self.lock().session.clone().ok_or(ProviderError::NotSignedIn)?;
        if !force_refresh {
            if let Some(cached) = &session.id_token {
                if cached.expires_at > self.clock.now_unix_secs() + REFRESH_MARGIN.as_secs() {
                    return Ok(cached.value.clone());
                }
            }
        }
        self.refresh(session).await
    }
}

#[cfg(test)]
#[path = "toolkit_test.rs"]
mod tests;
