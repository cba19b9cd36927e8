//! Bearer-token access for the current identity.
//!
//! ERROR HANDLING
//! ==============
//! Token retrieval never fails loudly: any provider error collapses to `None`
//! after being logged. `None` means the caller cannot make an authenticated
//! request; it is not a signal to retry.

use std::fmt;

use crate::identity::{Identity, IdentityProvider};

/// Opaque credential attached to backend requests.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[derive(Clone, Copy)]
pub struct TokenAccessor<'a> {
    provider: &'a dyn IdentityProvider,
}

impl<'a> TokenAccessor<'a> {
    #[must_use]
    pub fn new(provider: &'a dyn IdentityProvider) -> Self {
        Self { provider }
    }

    /// Token for whoever is signed in right now, or `None`.
    pub async fn get_token(&self, force_refresh: bool) -> Option<BearerToken> {
        if self.provider.current_identity().is_none() {
            log::debug!("token requested with no signed-in user");
            return None;
        }
        self.fetch(force_refresh).await
    }

    /// Token for `examined`, or `None` if the provider has since switched to a
    /// different user (or signed out).
    pub async fn token_for(&self, examined: &Identity, force_refresh: bool) -> Option<BearerToken> {
        match self.provider.current_identity() {
            Some(current) if current.uid == examined.uid => {}
            Some(_) => {
                log::warn!("identity changed before token request; refusing to mix users");
                return None;
            }
            None => return None,
        }
        self.fetch(force_refresh).await
    }

    async fn fetch(&self, force_refresh: bool) -> Option<BearerToken> {
        match self.provider.id_token(force_refresh).await {
            Ok(raw) => Some(BearerToken(raw)),
            Err(e) => {
                log::error!("failed to obtain id token: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
