//! `reqwest` implementations of the backend and provider transports.
//!
//! ERROR HANDLING
//! ==============
//! Client timeouts become [`ApiError::Timeout`]; every other `reqwest`
//! failure is a transport error carrying its message. Non-2xx statuses are
//! classified by `postgate::api` so the CLI and the browser agree.

use std::time::Duration;

use postgate::api::{
    ApiError, BlogApi, CHAT_PATH, ChatReply, ChatRequest, CommentRequest, CommentView, LikeRequest, LikeView,
    POSTS_PATH, PostView, comments_path, decode, decode_list, endpoint, like_path, likes_path, post_path,
};
use postgate::toolkit::{ToolkitTransport, TransportResponse};
use postgate::token::BearerToken;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

fn api_error(error: &reqwest::Error) -> ApiError {
    if error.is_timeout() { ApiError::Timeout } else { ApiError::Transport(error.to_string()) }
}

// =============================================================================
// BACKEND
// =============================================================================

pub struct ReqwestBlogApi {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestBlogApi {
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self { client: build_client(timeout)?, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    async fn send(&self, method: Method, path: &str, token: &BearerToken, body: Option<Value>) -> Result<String, ApiError> {
        let url = endpoint(&self.base_url, path);
        let request = self.client.request(method.clone(), &url).header(AUTHORIZATION, token.header_value());
        let request = if let Some(json) = body { request.json(&json) } else { request };

        let response = request.send().await.map_err(|e| api_error(&e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| api_error(&e))?;
        if status.is_success() {
            tracing::debug!(%method, %url, status = status.as_u16(), "backend request ok");
            Ok(text)
        } else {
            tracing::error!(%method, %url, status = status.as_u16(), "backend request failed");
            Err(ApiError::from_status(status.as_u16(), &text))
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait::async_trait(?Send)]
impl BlogApi for ReqwestBlogApi {
    async fn list_posts(&self, token: &BearerToken) -> Result<Vec<PostView>, ApiError> {
        decode_list(&self.send(Method::GET, POSTS_PATH, token, None).await?)
    }

    async fn get_post(&self, token: &BearerToken, slug: &str) -> Result<PostView, ApiError> {
        decode(&self.send(Method::GET, &post_path(slug), token, None).await?)
    }

    async fn list_likes(&self, token: &BearerToken, slug: &str) -> Result<Vec<LikeView>, ApiError> {
        decode_list(&self.send(Method::GET, &likes_path(slug), token, None).await?)
    }

    async fn list_comments(&self, token: &BearerToken, slug: &str) -> Result<Vec<CommentView>, ApiError> {
        decode_list(&self.send(Method::GET, &comments_path(slug), token, None).await?)
    }

    async fn like(&self, token: &BearerToken, slug: &str, profile_pic: Option<&str>) -> Result<LikeView, ApiError> {
        let body = to_json(&LikeRequest { profile_pic })?;
        decode(&self.send(Method::POST, &like_path(slug), token, Some(body)).await?)
    }

    async fn unlike(&self, token: &BearerToken, slug: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, &like_path(slug), token, None).await?;
        Ok(())
    }

    async fn add_comment(&self, token: &BearerToken, slug: &str, text: &str) -> Result<CommentView, ApiError> {
        let body = to_json(&CommentRequest { text })?;
        decode(&self.send(Method::POST, &comments_path(slug), token, Some(body)).await?)
    }

    async fn chat(&self, token: &BearerToken, message: &str) -> Result<ChatReply, ApiError> {
        let body = to_json(&ChatRequest { message })?;
        decode(&self.send(Method::POST, CHAT_PATH, token, Some(body)).await?)
    }
}

// =============================================================================
// PROVIDER TRANSPORT
// =============================================================================

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self { client: build_client(timeout)? })
    }
}

#[async_trait::async_trait(?Send)]
impl ToolkitTransport for ReqwestTransport {
    async fn post(&self, url: &str, content_type: &str, body: String) -> Result<TransportResponse, String> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| e.to_string())?;
        // The URL carries the API key; keep it out of the logs.
        tracing::debug!(status, "identity provider responded");
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;
