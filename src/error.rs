//! Error taxonomy for user-triggered flows.
//!
//! There is no `Unauthenticated` error: a signed-out visitor is a normal
//! page state ([`crate::loader::Denial::SignedOut`]), not an error.

use crate::api::ApiError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Input rejected locally, before any network call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Comment cannot be empty.")]
    EmptyComment,
    #[error("Message cannot be empty.")]
    EmptyMessage,
    #[error("Please enter your email and password.")]
    MissingCredentials,
    #[error("Please enter a nickname.")]
    MissingNickname,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Password must be at least {} characters.", MIN_PASSWORD_LEN)]
    PasswordTooShort,
}

/// Failure of an interactive action (like, comment, chat send).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Please sign in first.")]
    SignInRequired,
    #[error("Signed in, but your session token could not be obtained.")]
    TokenUnavailable,
    #[error("Your session has expired. Please sign in again.")]
    Expired,
    #[error("A previous request is still in progress.")]
    Busy,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Request(String),
}

impl From<ApiError> for FlowError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => Self::Expired,
            other => Self::Request(other.to_string()),
        }
    }
}
