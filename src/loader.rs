//! Gated page loading.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every page that needs backend data goes through [`GatedPageLoader::run`]:
//!
//! ```text
//! Pending ──ready(signed out)──────────────▶ Denied(SignedOut)
//!    │
//!    └─ready(signed in)─▶ Authorizing ──no token──▶ Denied(TokenUnavailable)
//!                             │
//!                             └─token─▶ Loading ──ok──▶ Loaded
//!                                          ├──401──▶ Expired
//!                                          └──err──▶ Error
//! ```
//!
//! No request is issued before the readiness signal resolves, and the token
//! used belongs to the identity the readiness signal reported.
//!
//! DESIGN
//! ======
//! Pages differ only in what they fetch, so the sequence lives here once and
//! each page supplies a [`PageStrategy`]. Transitions are reported to a sink
//! so binders can re-render at every step.

use std::time::Duration;

use crate::api::{ApiError, BlogApi};
use crate::gate::IdentityGate;
use crate::identity::{IdentityProvider, IdentityState};
use crate::navigation::{EXPIRED_REDIRECT_DELAY, Navigator, Route};
use crate::token::{BearerToken, TokenAccessor};

/// Why a page refused to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Denial {
    SignedOut,
    TokenUnavailable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageState<T> {
    Pending,
    Denied(Denial),
    Authorizing,
    Loading,
    Loaded(T),
    Expired,
    Error(String),
}

impl<T> PageState<T> {
    /// Whether the loader stops in this state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Denied(_) | Self::Loaded(_) | Self::Expired | Self::Error(_))
    }

    #[must_use]
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Denied(Denial::SignedOut) => "denied(signed-out)",
            Self::Denied(Denial::TokenUnavailable) => "denied(token-unavailable)",
            Self::Authorizing => "authorizing",
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::Expired => "expired",
            Self::Error(_) => "error",
        }
    }

    fn from_fetch(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Self::Loaded(data),
            Err(e) if e.is_unauthorized() => Self::Expired,
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// What one page fetches once it holds a token.
#[async_trait::async_trait(?Send)]
pub trait PageStrategy {
    type Data;

    /// Short page name used in log lines.
    fn name(&self) -> &'static str;

    /// Issue the page's request(s). Several requests should run concurrently
    /// and fail together.
    async fn fetch(&self, api: &dyn BlogApi, token: &BearerToken) -> Result<Self::Data, ApiError>;

    /// Whether an expired session also schedules a redirect to login.
    fn redirect_on_expired(&self) -> bool {
        false
    }
}

/// Final result of a load: the identity it was gated on and the end state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRun<T> {
    pub identity: IdentityState,
    pub state: PageState<T>,
}

pub struct GatedPageLoader<'a> {
    gate: &'a IdentityGate,
    provider: &'a dyn IdentityProvider,
    api: &'a dyn BlogApi,
    navigator: Option<&'a dyn Navigator>,
    redirect_delay: Duration,
}

impl<'a> GatedPageLoader<'a> {
    #[must_use]
    pub fn new(gate: &'a IdentityGate, provider: &'a dyn IdentityProvider, api: &'a dyn BlogApi) -> Self {
        Self { gate, provider, api, navigator: None, redirect_delay: EXPIRED_REDIRECT_DELAY }
    }

    /// Enable the delayed login redirect for strategies that ask for it.
    #[must_use]
    pub fn with_navigator(mut self, navigator: &'a dyn Navigator, redirect_delay: Duration) -> Self {
        self.navigator = Some(navigator);
        self.redirect_delay = redirect_delay;
        self
    }

    /// Drive one page load to a terminal state, reporting every transition.
    pub async fn run<S: PageStrategy>(
        &self,
        strategy: &S,
        mut sink: impl FnMut(&PageState<S::Data>),
    ) -> PageRun<S::Data> {
        let page = strategy.name();
        let mut report = |state: &PageState<S::Data>| {
            log::debug!("{page}: {}", state.label());
            sink(state);
        };

        report(&PageState::Pending);
        let identity = self.gate.on_ready().await;

        let Some(examined) = identity.identity().cloned() else {
            let state = PageState::Denied(Denial::SignedOut);
            report(&state);
            return PageRun { identity, state };
        };

        report(&PageState::Authorizing);
        let Some(token) = TokenAccessor::new(self.provider).token_for(&examined, false).await else {
            let state = PageState::Denied(Denial::TokenUnavailable);
            report(&state);
            return PageRun { identity, state };
        };

        report(&PageState::Loading);
        let result = strategy.fetch(self.api, &token).await;
        if let Err(e) = &result {
            log::error!("{page}: load failed: {e}");
        }
        let state = PageState::from_fetch(result);

        if matches!(state, PageState::Expired) && strategy.redirect_on_expired() {
            if let Some(navigator) = self.navigator {
                navigator.go_after(&Route::Login, self.redirect_delay);
            }
        }

        report(&state);
        PageRun { identity, state }
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
