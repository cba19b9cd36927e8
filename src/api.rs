//! Backend REST contract: wire models, endpoint paths, errors.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both front ends talk to the same backend. The browser client implements
//! [`BlogApi`] with `gloo-net`, the CLI with `reqwest`; both share the paths
//! and the response decoding below so they agree on every edge case.
//!
//! ERROR HANDLING
//! ==============
//! A 401 is always [`ApiError::Unauthorized`], which pages turn into the
//! session-expired state. Everything else keeps the server's message text so
//! it can be shown inline.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::token::BearerToken;

/// Upper bound on a single backend request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const POSTS_PATH: &str = "/api/posts";
pub const CHAT_PATH: &str = "/api/chat";

// =============================================================================
// MODELS
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "profilePic", default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

impl AuthorView {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self { id: None, name: name.to_owned(), profile_pic: None }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: AuthorView,
    #[serde(default)]
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub author: AuthorView,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub author: AuthorView,
    #[serde(default)]
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct LikeRequest<'a> {
    #[serde(rename = "profilePic")]
    pub profile_pic: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct CommentRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

// =============================================================================
// PATHS
// =============================================================================

#[must_use]
pub fn post_path(slug: &str) -> String {
    format!("{POSTS_PATH}/{slug}")
}

#[must_use]
pub fn likes_path(slug: &str) -> String {
    format!("{POSTS_PATH}/{slug}/likes")
}

#[must_use]
pub fn like_path(slug: &str) -> String {
    format!("{POSTS_PATH}/{slug}/like")
}

#[must_use]
pub fn comments_path(slug: &str) -> String {
    format!("{POSTS_PATH}/{slug}/comments")
}

/// Join a base URL (possibly empty, for same-origin requests) and a path.
#[must_use]
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the bearer token (HTTP 401).
    #[error("authorization expired")]
    Unauthorized,
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success response.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 401 {
            return Self::Unauthorized;
        }
        Self::Status { status, message: error_message(status, body) }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

fn error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(detail) = parsed.detail.as_str() {
            return detail.to_owned();
        }
        return parsed.detail.to_string();
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("request failed with status {status}")
    } else {
        trimmed.to_owned()
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decode a single JSON object.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when the body does not match `T`.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a JSON array. `null` and non-array bodies decode as empty, matching
/// how the pages treat "nothing here".
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when the body is not JSON or an element does
/// not match `T`.
pub fn decode_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ApiError> {
    let value: serde_json::Value = decode(body)?;
    if !value.is_array() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

// =============================================================================
// CLIENT TRAIT
// =============================================================================

/// Authenticated access to the blog backend. Every call carries
/// `Authorization: Bearer <token>`.
#[async_trait::async_trait(?Send)]
pub trait BlogApi: Send + Sync {
    async fn list_posts(&self, token: &BearerToken) -> Result<Vec<PostView>, ApiError>;

    async fn get_post(&self, token: &BearerToken, slug: &str) -> Result<PostView, ApiError>;

    async fn list_likes(&self, token: &BearerToken, slug: &str) -> Result<Vec<LikeView>, ApiError>;

    async fn list_comments(&self, token: &BearerToken, slug: &str) -> Result<Vec<CommentView>, ApiError>;

    /// Like a post; returns the created (or existing) like record.
    async fn like(&self, token: &BearerToken, slug: &str, profile_pic: Option<&str>) -> Result<LikeView, ApiError>;

    async fn unlike(&self, token: &BearerToken, slug: &str) -> Result<(), ApiError>;

    async fn add_comment(&self, token: &BearerToken, slug: &str, text: &str) -> Result<CommentView, ApiError>;

    async fn chat(&self, token: &BearerToken, message: &str) -> Result<ChatReply, ApiError>;
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
