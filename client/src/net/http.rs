//! Backend client over `gloo-net`.
//!
//! Client-side (hydrate): real HTTP calls with a bearer token and a bounded
//! round trip.
//! Server-side (SSR): every call fails with a transport error; pages never
//! load data during server rendering.
//!
//! ERROR HANDLING
//! ==============
//! Status classification and body decoding are shared with the CLI through
//! `postgate::api`, so a 401 means the same thing in both front ends.

#![allow(clippy::unused_async)]

use std::time::Duration;

use postgate::api::{
    ApiError, BlogApi, CHAT_PATH, ChatReply, ChatRequest, CommentRequest, CommentView, LikeRequest, LikeView,
    POSTS_PATH, PostView, comments_path, decode, decode_list, like_path, likes_path, post_path,
};
use postgate::token::BearerToken;
use serde::Serialize;

pub const SERVER_UNAVAILABLE: &str = "not available on server";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Delete,
}

#[derive(Clone, Debug)]
pub struct HttpBlogApi {
    base_url: String,
    timeout: Duration,
}

impl HttpBlogApi {
    /// `base_url` may be empty for same-origin requests.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), timeout }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, verb: Verb, path: &str, token: &BearerToken, body: Option<String>) -> Result<String, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            use gloo_net::http::Request;

            use crate::net::timeout::with_timeout;

            let url = postgate::api::endpoint(&self.base_url, path);
            let builder = match verb {
                Verb::Get => Request::get(&url),
                Verb::Post => Request::post(&url),
                Verb::Delete => Request::delete(&url),
            }
            .header("Authorization", &token.header_value());
            let request = match body {
                Some(body) => builder.header("Content-Type", postgate::toolkit::JSON_CONTENT_TYPE).body(body),
                None => builder.build(),
            }
            .map_err(|e| ApiError::Transport(e.to_string()))?;

            let round_trip = async {
                let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
                let text = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
                Ok::<_, ApiError>((response.status(), response.ok(), text))
            };
            let Some(outcome) = with_timeout(self.timeout, round_trip).await else {
                log::error!("{verb:?} {url} timed out");
                return Err(ApiError::Timeout);
            };
            let (status, ok, text) = outcome?;
            if ok {
                Ok(text)
            } else {
                log::error!("{verb:?} {url} failed with status {status}");
                Err(ApiError::from_status(status, &text))
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (verb, path, token, body, self.timeout);
            Err(ApiError::Transport(SERVER_UNAVAILABLE.to_owned()))
        }
    }

    async fn send_json<B: Serialize>(&self, verb: Verb, path: &str, token: &BearerToken, body: &B) -> Result<String, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send(verb, path, token, Some(body)).await
    }
}

#[async_trait::async_trait(?Send)]
impl BlogApi for HttpBlogApi {
    async fn list_posts(&self, token: &BearerToken) -> Result<Vec<PostView>, ApiError> {
        decode_list(&self.send(Verb::Get, POSTS_PATH, token, None).await?)
    }

    async fn get_post(&self, token: &BearerToken, slug: &str) -> Result<PostView, ApiError> {
        decode(&self.send(Verb::Get, &post_path(slug), token, None).await?)
    }

    async fn list_likes(&self, token: &BearerToken, slug: &str) -> Result<Vec<LikeView>, ApiError> {
        decode_list(&self.send(Verb::Get, &likes_path(slug), token, None).await?)
    }

    async fn list_comments(&self, token: &BearerToken, slug: &str) -> Result<Vec<CommentView>, ApiError> {
        decode_list(&self.send(Verb::Get, &comments_path(slug), token, None).await?)
    }

    async fn like(&self, token: &BearerToken, slug: &str, profile_pic: Option<&str>) -> Result<LikeView, ApiError> {
        let body = self.send_json(Verb::Post, &like_path(slug), token, &LikeRequest { profile_pic }).await?;
        decode(&body)
    }

    async fn unlike(&self, token: &BearerToken, slug: &str) -> Result<(), ApiError> {
        self.send(Verb::Delete, &like_path(slug), token, None).await?;
        Ok(())
    }

    async fn add_comment(&self, token: &BearerToken, slug: &str, text: &str) -> Result<CommentView, ApiError> {
        let body = self.send_json(Verb::Post, &comments_path(slug), token, &CommentRequest { text }).await?;
        decode(&body)
    }

    async fn chat(&self, token: &BearerToken, message: &str) -> Result<ChatReply, ApiError> {
        decode(&self.send_json(Verb::Post, CHAT_PATH, token, &ChatRequest { message }).await?)
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;
