//! Identity values and the provider seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! The identity provider owns sessions. This crate only ever sees immutable
//! [`IdentityState`] snapshots pushed through [`IdentityProvider::subscribe`];
//! each notification replaces the previous snapshot wholesale.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::form_urlencoded::byte_serialize;

/// A signed-in user as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: String,
    pub photo_url: Option<String>,
}

impl Identity {
    /// Name shown to other users: the display name, or the email when the
    /// display name is missing or blank.
    #[must_use]
    pub fn name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }

    /// Avatar URL sent along with likes. Falls back to a generated avatar
    /// keyed by [`Identity::name`].
    #[must_use]
    pub fn avatar_url(&self) -> String {
        match self.photo_url.as_deref() {
            Some(url) if !url.is_empty() => url.to_owned(),
            _ => fallback_avatar_url(self.name()),
        }
    }
}

/// Generated avatar for users without a profile picture.
#[must_use]
pub fn fallback_avatar_url(name: &str) -> String {
    format!("https://i.pravatar.cc/50?u={}", byte_serialize(name.as_bytes()).collect::<String>())
}

/// Snapshot of who is signed in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IdentityState {
    #[default]
    Unauthenticated,
    Authenticated(Identity),
}

impl IdentityState {
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Unauthenticated => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Uid for log lines; never includes credentials.
    #[must_use]
    pub fn log_label(&self) -> &str {
        self.identity().map_or("signed out", |identity| identity.uid.as_str())
    }
}

impl From<Option<Identity>> for IdentityState {
    fn from(value: Option<Identity>) -> Self {
        value.map_or(Self::Unauthenticated, Self::Authenticated)
    }
}

/// Errors reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("invalid email or password")]
    InvalidCredential,
    #[error("email already in use")]
    EmailInUse,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password too weak")]
    WeakPassword,
    #[error("session revoked: {0}")]
    SessionRevoked(String),
    #[error("no signed-in user")]
    NotSignedIn,
    #[error("provider request failed: {0}")]
    Network(String),
    #[error("provider error {code}")]
    Other { code: String },
}

/// Callback invoked on every identity change.
pub type IdentityListener = Arc<dyn Fn(IdentityState) + Send + Sync>;

/// The external identity provider.
///
/// Implementations must push the current state to a listener at least once
/// after it subscribes, then again on every sign-in, sign-out, or refresh that
/// changes who is signed in.
#[async_trait::async_trait(?Send)]
pub trait IdentityProvider: Send + Sync {
    /// Register a listener for identity changes.
    fn subscribe(&self, listener: IdentityListener);

    /// The identity the provider currently considers signed in.
    fn current_identity(&self) -> Option<Identity>;

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the credentials are rejected or the
    /// provider is unreachable.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, ProviderError>;

    /// Create a new account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the account cannot be created.
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, ProviderError>;

    /// Set the display name of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotSignedIn`] without a session, or the
    /// provider's rejection.
    async fn update_display_name(&self, display_name: &str) -> Result<Identity, ProviderError>;

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the provider could not sign out.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Fetch a bearer credential for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotSignedIn`] without a session, or the
    /// provider's failure.
    async fn id_token(&self, force_refresh: bool) -> Result<String, ProviderError>;
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
