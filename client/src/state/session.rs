//! Session context: identity provider, identity gate, backend client.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`Session`] is built by the root component and provided through
//! Leptos context. The gate subscribes to the provider as soon as the session
//! exists; the navbar reads the gate's output through [`NavSignals`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use leptos::prelude::*;
use postgate::config::ClientConfig;
use postgate::gate::{IdentityGate, NavBinder, NavView};
use postgate::loader::GatedPageLoader;
use postgate::toolkit::ToolkitProvider;

use crate::net::http::HttpBlogApi;
use crate::net::transport::FetchTransport;
use crate::util::browser::{BrowserClock, BrowserNavigator, api_key};
use crate::util::storage::LocalStore;

pub type BrowserProvider = ToolkitProvider<FetchTransport, BrowserClock>;

/// Navbar state written by the identity gate.
#[derive(Clone, Copy, Debug)]
pub struct NavSignals {
    pub view: RwSignal<NavView>,
    /// Set once the logout control has been wired up.
    pub logout_bound: RwSignal<bool>,
}

impl NavSignals {
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: RwSignal::new(NavView::from_state(&postgate::identity::IdentityState::Unauthenticated)),
            logout_bound: RwSignal::new(false),
        }
    }
}

impl Default for NavSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl NavBinder for NavSignals {
    fn apply(&self, view: &NavView) {
        self.view.set(view.clone());
    }

    fn bind_logout(&self) {
        self.logout_bound.set(true);
    }
}

#[derive(Clone)]
pub struct Session {
    pub config: Arc<ClientConfig>,
    pub provider: Arc<BrowserProvider>,
    pub gate: Arc<IdentityGate>,
    pub api: Arc<HttpBlogApi>,
    pub store: Arc<LocalStore>,
    pub navigator: BrowserNavigator,
    pub nav: NavSignals,
}

impl Session {
    /// Wire everything together. The provider is not started here.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let store = Arc::new(LocalStore);
        let provider = Arc::new(ToolkitProvider::new(
            config.endpoints(),
            FetchTransport::new(config.request_timeout),
            BrowserClock,
            store.clone(),
        ));
        let nav = NavSignals::new();
        let gate = IdentityGate::connect(provider.as_ref(), Arc::new(nav));
        let api = Arc::new(HttpBlogApi::new(&config.api_base_url, config.request_timeout));
        Self { config: Arc::new(config), provider, gate, api, store, navigator: BrowserNavigator, nav }
    }

    /// Session for the running page: API key from the document, backend on
    /// the same origin.
    #[must_use]
    pub fn from_browser() -> Self {
        let mut config = ClientConfig::with_defaults(api_key());
        config.api_base_url = String::new();
        Self::new(config)
    }

    /// A loader for one page load or chat send.
    #[must_use]
    pub fn loader(&self) -> GatedPageLoader<'_> {
        GatedPageLoader::new(&self.gate, self.provider.as_ref(), self.api.as_ref())
            .with_navigator(&self.navigator, self.config.expired_redirect_delay)
    }
}

pub fn use_session() -> Session {
    expect_context::<Session>()
}
