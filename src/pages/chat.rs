//! Chat panel.
//!
//! Each send is an independent gated request: the loader runs again per
//! message, so a session that expired since the page opened is caught on the
//! next send. No conversation history is sent to the backend.

use crate::api::{ApiError, BlogApi, ChatReply};
use crate::error::{FlowError, ValidationError};
use crate::identity::IdentityState;
use crate::loader::{Denial, GatedPageLoader, PageRun, PageState, PageStrategy};
use crate::token::BearerToken;
use crate::view::TOKEN_UNAVAILABLE;

pub const THINKING: &str = "Thinking...";
pub const CHAT_SIGNED_OUT: &str = "Please sign in to use the chat.";
pub const CHAT_EXPIRED: &str = "Your session has expired. Please sign in again.";
pub const CHAT_FAILED: &str = "Something went wrong. Please try again later.";

pub struct ChatSendStrategy {
    pub message: String,
}

#[async_trait::async_trait(?Send)]
impl PageStrategy for ChatSendStrategy {
    type Data = ChatReply;

    fn name(&self) -> &'static str {
        "chat"
    }

    async fn fetch(&self, api: &dyn BlogApi, token: &BearerToken) -> Result<ChatReply, ApiError> {
        api.chat(token, &self.message).await
    }

    fn redirect_on_expired(&self) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatLine {
    pub speaker: Speaker,
    pub text: String,
    /// Placeholder shown while the reply is outstanding.
    pub pending: bool,
}

impl ChatLine {
    #[must_use]
    pub fn user(text: &str) -> Self {
        Self { speaker: Speaker::User, text: text.to_owned(), pending: false }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self { speaker: Speaker::Assistant, text: text.into(), pending: false }
    }
}

/// Visible chat state: overlay, input enablement, transcript.
#[derive(Clone, Debug, Default)]
pub struct ChatSession {
    unlocked: bool,
    in_flight: bool,
    lines: Vec<ChatLine>,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the readiness value: signed-in users get the input, everyone
    /// else keeps the sign-in overlay.
    pub fn apply_ready(&mut self, state: &IdentityState) {
        self.unlocked = state.is_authenticated();
        log::debug!("chat {}", if self.unlocked { "unlocked" } else { "locked" });
    }

    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        !self.unlocked
    }

    /// Input and send button are enabled only when unlocked and idle.
    #[must_use]
    pub fn input_enabled(&self) -> bool {
        self.unlocked && !self.in_flight
    }

    #[must_use]
    pub fn lines(&self) -> &[ChatLine] {
        &self.lines
    }

    /// Accept a message: append it with a pending reply placeholder and
    /// disable the input. Returns the trimmed text to send.
    ///
    /// # Errors
    ///
    /// [`FlowError::SignInRequired`] while locked, [`FlowError::Busy`] while
    /// a send is in flight, [`ValidationError::EmptyMessage`] for blank input.
    pub fn begin_send(&mut self, raw: &str) -> Result<String, FlowError> {
        if !self.unlocked {
            return Err(FlowError::SignInRequired);
        }
        if self.in_flight {
            return Err(FlowError::Busy);
        }
        let text = raw.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }
        self.in_flight = true;
        self.lines.push(ChatLine::user(text));
        self.lines.push(ChatLine { speaker: Speaker::Assistant, text: THINKING.to_owned(), pending: true });
        Ok(text.to_owned())
    }

    /// Replace the placeholder with the reply or an error line and re-enable
    /// the input.
    pub fn finish_send(&mut self, state: &PageState<ChatReply>) {
        self.lines.retain(|line| !line.pending);
        let line = match state {
            PageState::Loaded(reply) => ChatLine::assistant(reply.reply.clone()),
            PageState::Expired => ChatLine::assistant(CHAT_EXPIRED),
            PageState::Denied(Denial::SignedOut) => ChatLine::assistant(CHAT_SIGNED_OUT),
            PageState::Denied(Denial::TokenUnavailable) => ChatLine::assistant(TOKEN_UNAVAILABLE),
            PageState::Error(message) => {
                log::error!("chat send failed: {message}");
                ChatLine::assistant(CHAT_FAILED)
            }
            PageState::Pending | PageState::Authorizing | PageState::Loading => return,
        };
        self.lines.push(line);
        self.in_flight = false;
    }

    /// Full send cycle through `loader`.
    ///
    /// # Errors
    ///
    /// Whatever [`Self::begin_send`] rejects; request failures end up in the
    /// transcript instead.
    pub async fn send(&mut self, loader: &GatedPageLoader<'_>, raw: &str) -> Result<PageRun<ChatReply>, FlowError> {
        let message = self.begin_send(raw)?;
        let run = loader.run(&ChatSendStrategy { message }, |_| {}).await;
        self.finish_send(&run.state);
        Ok(run)
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
