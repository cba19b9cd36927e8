//! Locally persisted session hints.
//!
//! SYSTEM CONTEXT
//! ==============
//! Login and registration leave a few convenience values behind (last email,
//! nickname, last token). They are never consulted for authorization; the
//! provider's own session is authoritative. Logout clears them.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::identity::Identity;

pub const USER_EMAIL_KEY: &str = "userEmail";
pub const USER_NICKNAME_KEY: &str = "userNickname";
pub const ID_TOKEN_KEY: &str = "firebaseIdToken";

const HINT_KEYS: [&str; 3] = [USER_EMAIL_KEY, USER_NICKNAME_KEY, ID_TOKEN_KEY];

/// String key/value persistence (browser `localStorage`, a JSON file, ...).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store used by tests and as a fallback when nothing persistent
/// is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Typed view over the hint keys of a [`KeyValueStore`].
pub struct SessionHints<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> SessionHints<'a> {
    #[must_use]
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Record a successful sign-in. `nickname` overrides the identity's
    /// display name (registration knows it before the provider echoes it).
    pub fn record_sign_in(&self, identity: &Identity, nickname: Option<&str>, token: Option<&str>) {
        self.store.set(USER_EMAIL_KEY, &identity.email);
        let nickname = nickname.or(identity.display_name.as_deref()).unwrap_or_default();
        self.store.set(USER_NICKNAME_KEY, nickname);
        if let Some(token) = token {
            self.store.set(ID_TOKEN_KEY, token);
        }
    }

    #[must_use]
    pub fn email(&self) -> Option<String> {
        self.store.get(USER_EMAIL_KEY)
    }

    #[must_use]
    pub fn nickname(&self) -> Option<String> {
        self.store.get(USER_NICKNAME_KEY)
    }

    #[cfg(test)]
    #[must_use]
    pub fn last_token(&self) -> Option<String> {
        self.store.get(ID_TOKEN_KEY)
    }

    pub fn clear(&self) {
        for key in HINT_KEYS {
            self.store.remove(key);
        }
    }
}

#[cfg(test)]
#[path = "hints_test.rs"]
mod tests;
