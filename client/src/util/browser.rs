//! Browser glue: document metadata, location, alerts, wall clock.
//!
//! Everything here degrades to a no-op (or a native fallback) outside the
//! `hydrate` build so components can call it unconditionally.

use std::time::Duration;

use postgate::navigation::{Navigator, Route};
use postgate::toolkit::Clock;

/// Name of the `<meta>` tag carrying the identity provider API key.
pub const API_KEY_META: &str = "postgate-api-key";

/// Provider API key published by the server shell.
pub fn api_key() -> String {
    #[cfg(feature = "hydrate")]
    {
        let selector = format!("meta[name=\"{API_KEY_META}\"]");
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector(&selector).ok().flatten())
            .and_then(|meta| meta.get_attribute("content"))
            .unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        std::env::var(postgate::config::API_KEY_VAR).unwrap_or_default()
    }
}

pub fn alert(message: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        log::warn!("alert outside the browser: {message}");
    }
}

pub fn set_document_title(title: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            document.set_title(title);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = title;
    }
}

/// `Date.now()` in the browser; the system clock elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_unix_secs(&self) -> u64 {
        #[cfg(feature = "hydrate")]
        {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let secs = (js_sys::Date::now() / 1000.0) as u64;
            secs
        }
        #[cfg(not(feature = "hydrate"))]
        {
            postgate::toolkit::SystemClock.now_unix_secs()
        }
    }
}

/// Full page loads through `window.location`.
///
/// Pages re-run their gated load from scratch on every visit, so a hard
/// navigation is what we want here rather than a router transition.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn go(&self, route: &Route) {
        let href = route.href();
        log::debug!("navigating to {href}");
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(&href);
            }
        }
    }

    fn go_after(&self, route: &Route, delay: Duration) {
        #[cfg(feature = "hydrate")]
        {
            let route = route.clone();
            let millis = crate::net::timeout::timeout_millis(delay);
            gloo_timers::callback::Timeout::new(millis, move || BrowserNavigator.go(&route)).forget();
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = delay;
            self.go(route);
        }
    }
}
