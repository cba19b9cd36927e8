//! Fakes shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::{ApiError, BlogApi, ChatReply, CommentView, LikeView, PostView};
use crate::gate::{NavBinder, NavView};
use crate::identity::{Identity, IdentityListener, IdentityProvider, IdentityState, ProviderError};
use crate::navigation::{Navigator, Route};
use crate::token::BearerToken;

#[must_use]
pub fn ann() -> Identity {
    Identity {
        uid: "uid-ann".to_owned(),
        display_name: Some("Ann".to_owned()),
        email: "ann@example.com".to_owned(),
        photo_url: None,
    }
}

#[must_use]
pub fn bob() -> Identity {
    Identity {
        uid: "uid-bob".to_owned(),
        display_name: None,
        email: "bob@example.com".to_owned(),
        photo_url: Some("https://img.example/bob.png".to_owned()),
    }
}

#[must_use]
pub fn post(slug: &str, title: &str, author: &str) -> PostView {
    PostView {
        id: None,
        slug: slug.to_owned(),
        title: title.to_owned(),
        author: crate::api::AuthorView::named(author),
        content: format!("<p>{title}</p>"),
    }
}

#[must_use]
pub fn like_by(name: &str) -> LikeView {
    LikeView { id: None, author: crate::api::AuthorView::named(name) }
}

#[must_use]
pub fn comment_by(name: &str, text: &str) -> CommentView {
    CommentView { id: None, author: crate::api::AuthorView::named(name), text: text.to_owned() }
}

// =============================================================================
// FakeProvider
// =============================================================================

pub struct FakeProvider {
    listeners: Mutex<Vec<IdentityListener>>,
    current: Mutex<Option<Identity>>,
    token: Mutex<Result<String, ProviderError>>,
    sign_in: Mutex<Result<Identity, ProviderError>>,
    create: Mutex<Result<Identity, ProviderError>>,
    sign_out: Mutex<Result<(), ProviderError>>,
    pub token_calls: AtomicUsize,
    pub forced_token_calls: AtomicUsize,
    pub sign_out_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub sign_in_calls: AtomicUsize,
}

impl FakeProvider {
    #[must_use]
    pub fn new(current: Option<Identity>) -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            current: Mutex::new(current),
            token: Mutex::new(Ok("token-1".to_owned())),
            sign_in: Mutex::new(Ok(ann())),
            create: Mutex::new(Ok(ann())),
            sign_out: Mutex::new(Ok(())),
            token_calls: AtomicUsize::new(0),
            forced_token_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            sign_in_calls: AtomicUsize::new(0),
        }
    }

    /// Set the provider's current user and notify every listener.
    pub fn emit(&self, state: IdentityState) {
        *self.current.lock().unwrap() = state.identity().cloned();
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener(state.clone());
        }
    }

    /// Change the current user without notifying anyone.
    pub fn set_current_silently(&self, identity: Option<Identity>) {
        *self.current.lock().unwrap() = identity;
    }

    pub fn set_token(&self, result: Result<String, ProviderError>) {
        *self.token.lock().unwrap() = result;
    }

    pub fn set_sign_in(&self, result: Result<Identity, ProviderError>) {
        *self.sign_in.lock().unwrap() = result;
    }

    pub fn set_create(&self, result: Result<Identity, ProviderError>) {
        *self.create.lock().unwrap() = result;
    }

    pub fn set_sign_out(&self, result: Result<(), ProviderError>) {
        *self.sign_out.lock().unwrap() = result;
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for FakeProvider {
    fn subscribe(&self, listener: IdentityListener) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn current_identity(&self) -> Option<Identity> {
        self.current.lock().unwrap().clone()
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Identity, ProviderError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.sign_in.lock().unwrap().clone();
        if let Ok(identity) = &result {
            self.emit(IdentityState::Authenticated(identity.clone()));
        }
        result
    }

    async fn create_account(&self, email: &str, _password: &str) -> Result<Identity, ProviderError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.create.lock().unwrap().clone().map(|mut identity| {
            identity.email = email.to_owned();
            identity.display_name = None;
            identity
        });
        if let Ok(identity) = &result {
            self.emit(IdentityState::Authenticated(identity.clone()));
        }
        result
    }

    async fn update_display_name(&self, display_name: &str) -> Result<Identity, ProviderError> {
        let mut identity = self.current_identity().ok_or(ProviderError::NotSignedIn)?;
        identity.display_name = Some(display_name.to_owned());
        self.emit(IdentityState::Authenticated(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.sign_out.lock().unwrap().clone();
        if result.is_ok() {
            self.emit(IdentityState::Unauthenticated);
        }
        result
    }

    async fn id_token(&self, force_refresh: bool) -> Result<String, ProviderError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        if force_refresh {
            self.forced_token_calls.fetch_add(1, Ordering::SeqCst);
        }
        self.token.lock().unwrap().clone()
    }
}

// =============================================================================
// MockApi
// =============================================================================

pub struct MockApi {
    pub calls: Mutex<Vec<String>>,
    pub tokens: Mutex<Vec<String>>,
    pub posts: Mutex<Result<Vec<PostView>, ApiError>>,
    pub post: Mutex<Result<PostView, ApiError>>,
    pub likes: Mutex<Result<Vec<LikeView>, ApiError>>,
    pub comments: Mutex<Result<Vec<CommentView>, ApiError>>,
    pub like: Mutex<Result<LikeView, ApiError>>,
    pub unlike: Mutex<Result<(), ApiError>>,
    pub comment: Mutex<Result<CommentView, ApiError>>,
    pub chat: Mutex<Result<ChatReply, ApiError>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
            posts: Mutex::new(Ok(Vec::new())),
            post: Mutex::new(Ok(post("hello", "Hello", "Ann"))),
            likes: Mutex::new(Ok(Vec::new())),
            comments: Mutex::new(Ok(Vec::new())),
            like: Mutex::new(Ok(like_by("Ann"))),
            unlike: Mutex::new(Ok(())),
            comment: Mutex::new(Ok(comment_by("Ann", "hi"))),
            chat: Mutex::new(Ok(ChatReply { reply: "hello there".to_owned() })),
        }
    }
}

impl MockApi {
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String, token: &BearerToken) {
        self.calls.lock().unwrap().push(call);
        self.tokens.lock().unwrap().push(token.as_str().to_owned());
    }
}

#[async_trait::async_trait(?Send)]
impl BlogApi for MockApi {
    async fn list_posts(&self, token: &BearerToken) -> Result<Vec<PostView>, ApiError> {
        self.record("GET /api/posts".to_owned(), token);
        self.posts.lock().unwrap().clone()
    }

    async fn get_post(&self, token: &BearerToken, slug: &str) -> Result<PostView, ApiError> {
        self.record(format!("GET /api/posts/{slug}"), token);
        self.post.lock().unwrap().clone()
    }

    async fn list_likes(&self, token: &BearerToken, slug: &str) -> Result<Vec<LikeView>, ApiError> {
        self.record(format!("GET /api/posts/{slug}/likes"), token);
        self.likes.lock().unwrap().clone()
    }

    async fn list_comments(&self, token: &BearerToken, slug: &str) -> Result<Vec<CommentView>, ApiError> {
        self.record(format!("GET /api/posts/{slug}/comments"), token);
        self.comments.lock().unwrap().clone()
    }

    async fn like(&self, token: &BearerToken, slug: &str, _profile_pic: Option<&str>) -> Result<LikeView, ApiError> {
        self.record(format!("POST /api/posts/{slug}/like"), token);
        self.like.lock().unwrap().clone()
    }

    async fn unlike(&self, token: &BearerToken, slug: &str) -> Result<(), ApiError> {
        self.record(format!("DELETE /api/posts/{slug}/like"), token);
        self.unlike.lock().unwrap().clone()
    }

    async fn add_comment(&self, token: &BearerToken, slug: &str, _text: &str) -> Result<CommentView, ApiError> {
        self.record(format!("POST /api/posts/{slug}/comments"), token);
        self.comment.lock().unwrap().clone()
    }

    async fn chat(&self, token: &BearerToken, _message: &str) -> Result<ChatReply, ApiError> {
        self.record("POST /api/chat".to_owned(), token);
        self.chat.lock().unwrap().clone()
    }
}

// =============================================================================
// Navigation recorders
// =============================================================================

#[derive(Default)]
pub struct RecordingNav {
    pub views: Mutex<Vec<NavView>>,
    pub logout_binds: AtomicUsize,
}

impl RecordingNav {
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn last(&self) -> Option<NavView> {
        self.views.lock().unwrap().last().cloned()
    }
}

impl NavBinder for RecordingNav {
    fn apply(&self, view: &NavView) {
        self.views.lock().unwrap().push(view.clone());
    }

    fn bind_logout(&self) {
        self.logout_binds.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub visits: Mutex<Vec<(Route, Option<std::time::Duration>)>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn visits(&self) -> Vec<(Route, Option<std::time::Duration>)> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go(&self, route: &Route) {
        self.visits.lock().unwrap().push((route.clone(), None));
    }

    fn go_after(&self, route: &Route, delay: std::time::Duration) {
        self.visits.lock().unwrap().push((route.clone(), Some(delay)));
    }
}
