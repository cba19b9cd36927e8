//! Terminal stand-ins for the browser's navbar and location.
//!
//! A command runs once and exits, so "navigating" only records where the
//! browser would have gone; `main` prints it at the end.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use postgate::gate::{NavBinder, NavView};
use postgate::navigation::{Navigator, Route};

#[derive(Debug, Default)]
pub struct TerminalNavigator {
    last: Mutex<Option<(Route, Duration)>>,
}

impl TerminalNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last requested route and its delay.
    pub fn last(&self) -> Option<(Route, Duration)> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Navigator for TerminalNavigator {
    fn go(&self, route: &Route) {
        self.go_after(route, Duration::ZERO);
    }

    fn go_after(&self, route: &Route, delay: Duration) {
        tracing::debug!(href = %route.href(), delay_ms = delay.as_millis(), "navigation requested");
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some((route.clone(), delay));
    }
}

/// Keeps the latest [`NavView`] for `whoami`.
#[derive(Debug, Default)]
pub struct TerminalNav {
    view: Mutex<NavView>,
    logout_bound: Mutex<bool>,
}

impl TerminalNav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> NavView {
        self.view.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn logout_bound(&self) -> bool {
        *self.logout_bound.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NavBinder for TerminalNav {
    fn apply(&self, view: &NavView) {
        *self.view.lock().unwrap_or_else(PoisonError::into_inner) = view.clone();
    }

    fn bind_logout(&self) {
        *self.logout_bound.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }
}

/// Line describing a recorded navigation.
pub fn describe_navigation(route: &Route, delay: Duration) -> String {
    if delay.is_zero() {
        format!("-> {}", route.href())
    } else {
        format!("-> {} (after {} ms)", route.href(), delay.as_millis())
    }
}

#[cfg(test)]
#[path = "term_test.rs"]
mod term_test;
