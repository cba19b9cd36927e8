//! Routes and the navigation seam.

use std::time::Duration;

use url::form_urlencoded::byte_serialize;

/// Delay before an expired session on the post or chat page is sent to login.
pub const EXPIRED_REDIRECT_DELAY: Duration = Duration::from_millis(2000);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Post { slug: String },
    Chat,
}

impl Route {
    #[must_use]
    pub fn href(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::Register => "/register".to_owned(),
            Self::Post { slug } => format!("/post?slug={}", byte_serialize(slug.as_bytes()).collect::<String>()),
            Self::Chat => "/chat".to_owned(),
        }
    }
}

/// Moves the user between pages. Browser binders change `location`; the CLI
/// just reports where it would go.
pub trait Navigator: Send + Sync {
    fn go(&self, route: &Route);

    /// Navigate once `delay` has elapsed. The default navigates immediately.
    fn go_after(&self, route: &Route, delay: Duration) {
        let _ = delay;
        self.go(route);
    }
}

#[cfg(test)]
#[path = "navigation_test.rs"]
mod tests;
