//! Framework-free view descriptions shared by every page.
//!
//! DESIGN
//! ======
//! Pages render `PageState → view` with pure functions; the web client and
//! the CLI only apply the result. Copy that differs per page lives in a
//! [`PageCopy`]; copy shared by all pages lives here.

use crate::loader::{Denial, PageState};

pub const RESOLVING_SESSION: &str = "Resolving your session...";
pub const TOKEN_UNAVAILABLE: &str = "You are signed in, but your session token could not be obtained. Please sign in again.";

/// Visual family of a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Neutral progress text.
    Info,
    /// Empty results.
    Muted,
    /// Sign-in prompts (signed out, token unavailable, expired).
    Prompt,
    Error,
}

impl Tone {
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Info => "notice notice--info",
            Self::Muted => "notice notice--muted",
            Self::Prompt => "notice notice--prompt",
            Self::Error => "notice notice--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub tone: Tone,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self { tone, text: text.into() }
    }
}

/// Page-specific wording for the shared states.
#[derive(Clone, Copy, Debug)]
pub struct PageCopy {
    pub signed_out: &'static str,
    pub loading: &'static str,
    pub expired: &'static str,
    pub error_prefix: &'static str,
}

/// Notice for every state except `Loaded`, which the page renders itself.
#[must_use]
pub fn state_notice<T>(state: &PageState<T>, copy: &PageCopy) -> Option<Notice> {
    let notice = match state {
        PageState::Pending => Notice::new(Tone::Info, RESOLVING_SESSION),
        PageState::Denied(Denial::SignedOut) => Notice::new(Tone::Prompt, copy.signed_out),
        PageState::Denied(Denial::TokenUnavailable) => Notice::new(Tone::Prompt, TOKEN_UNAVAILABLE),
        PageState::Authorizing | PageState::Loading => Notice::new(Tone::Info, copy.loading),
        PageState::Expired => Notice::new(Tone::Prompt, copy.expired),
        PageState::Error(message) => Notice::new(Tone::Error, format!("{}: {message}", copy.error_prefix)),
        PageState::Loaded(_) => return None,
    };
    Some(notice)
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
