//! Identity gate: provider notifications → readiness signal + navbar.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every page waits on [`IdentityGate::on_ready`] before doing anything that
//! depends on who is signed in. The gate subscribes to the provider once, at
//! construction, and keeps re-rendering the navigation bar on every later
//! notification (login, logout, token refresh, other tabs).
//!
//! DESIGN
//! ======
//! Readiness is a [`Latch`]: the first notification resolves it and all later
//! notifications only replace the `current` snapshot. The logout control is
//! bound at most once per gate no matter how many authenticated notifications
//! arrive.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::hints::{KeyValueStore, SessionHints};
use crate::identity::{IdentityProvider, IdentityState, ProviderError};
use crate::latch::Latch;
use crate::navigation::{Navigator, Route};

/// What the navigation bar should show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavView {
    /// Login/register links visible.
    pub show_auth_links: bool,
    /// Welcome line for the signed-in user; `None` hides the user block.
    pub welcome: Option<String>,
}

impl NavView {
    #[must_use]
    pub fn from_state(state: &IdentityState) -> Self {
        match state.identity() {
            Some(identity) => Self {
                show_auth_links: false,
                welcome: Some(format!("Welcome, {}", identity.name())),
            },
            None => Self { show_auth_links: true, welcome: None },
        }
    }
}

/// Applies [`NavView`]s to a concrete surface.
pub trait NavBinder: Send + Sync {
    fn apply(&self, view: &NavView);

    /// Attach the logout action to the logout control.
    fn bind_logout(&self);
}

pub struct IdentityGate {
    ready: Latch<IdentityState>,
    current: Mutex<IdentityState>,
    notifications: AtomicUsize,
    logout_bound: AtomicBool,
    nav: Arc<dyn NavBinder>,
}

impl IdentityGate {
    #[must_use]
    pub fn new(nav: Arc<dyn NavBinder>) -> Arc<Self> {
        Arc::new(Self {
            ready: Latch::new(),
            current: Mutex::new(IdentityState::Unauthenticated),
            notifications: AtomicUsize::new(0),
            logout_bound: AtomicBool::new(false),
            nav,
        })
    }

    /// Build a gate and subscribe it to `provider` right away.
    #[must_use]
    pub fn connect(provider: &dyn IdentityProvider, nav: Arc<dyn NavBinder>) -> Arc<Self> {
        let gate = Self::new(nav);
        gate.listen(provider);
        gate
    }

    pub fn listen(self: &Arc<Self>, provider: &dyn IdentityProvider) {
        let gate = Arc::clone(self);
        provider.subscribe(Arc::new(move |state| gate.observe(state)));
    }

    /// Handle one provider notification.
    pub fn observe(&self, state: IdentityState) {
        let count = self.notifications.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("identity changed (#{count}): {}", state.log_label());

        self.nav.apply(&NavView::from_state(&state));
        if state.is_authenticated() && !self.logout_bound.swap(true, Ordering::SeqCst) {
            self.nav.bind_logout();
        }

        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = state.clone();
        if self.ready.resolve(state) {
            log::debug!("identity gate ready");
        }
    }

    /// Resolves with the first identity snapshot observed by this gate.
    pub fn on_ready(&self) -> impl Future<Output = IdentityState> + use<> {
        self.ready.wait()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.is_resolved()
    }

    /// The most recent snapshot, which may be newer than the readiness value.
    #[must_use]
    pub fn current(&self) -> IdentityState {
        self.current.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn notifications(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }
}

/// The logout action bound to the navbar control.
///
/// Sign-out failures are logged and returned; the navbar is left alone since
/// the provider's next notification will correct it.
///
/// # Errors
///
/// Returns the provider's [`ProviderError`] when sign-out fails.
pub async fn logout(
    provider: &dyn IdentityProvider,
    store: &dyn KeyValueStore,
    navigator: &dyn Navigator,
) -> Result<(), ProviderError> {
    if let Err(e) = provider.sign_out().await {
        log::error!("sign-out failed: {e}");
        return Err(e);
    }
    SessionHints::new(store).clear();
    log::info!("signed out; returning home");
    navigator.go(&Route::Home);
    Ok(())
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
