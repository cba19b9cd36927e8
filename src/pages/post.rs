//! Single post page: article, likers, comments.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page loads the post, its likes and its comments concurrently through
//! the gated loader. Once loaded, [`PostInteraction`] owns the mutable part
//! (like membership and the comment list) for the rest of the page session;
//! nothing is re-fetched after a like or comment.
//!
//! DESIGN
//! ======
//! Each interactive action is split into `begin_*` (validate, mark in flight,
//! apply the optimistic change) and `settle_*` (reconcile with the server's
//! answer). Reactive binders call the two halves around their own request so
//! they never hold a borrow across an await; [`PostInteraction::toggle_like`]
//! and [`PostInteraction::submit_comment`] run the whole cycle for callers
//! that can.
//!
//! A failed like or unlike restores the membership and list that existed
//! before the optimistic change.

use crate::api::{ApiError, AuthorView, BlogApi, CommentView, LikeView, PostView};
use crate::error::{FlowError, ValidationError};
use crate::identity::{Identity, IdentityProvider, fallback_avatar_url};
use crate::loader::{PageState, PageStrategy};
use crate::navigation::{EXPIRED_REDIRECT_DELAY, Navigator, Route};
use crate::token::{BearerToken, TokenAccessor};
use crate::view::{Notice, PageCopy, Tone, state_notice};

pub const POST_COPY: PageCopy = PageCopy {
    signed_out: "Please sign in to read this post.",
    loading: "Loading...",
    expired: "Your session has expired. Redirecting to sign in...",
    error_prefix: "Failed to load the post",
};

pub const MISSING_SLUG: &str = "Error: the post slug is missing.";
pub const ANONYMOUS: &str = "Anonymous";
pub const NO_LIKES: &str = "Nobody has liked this post yet.";
pub const NO_COMMENTS: &str = "There are no comments on this post yet.";
pub const LIKE_FAILED: &str = "Could not update your like. Please try again.";
pub const LIKE_SIGN_IN: &str = "Please sign in before liking a post.";
pub const COMMENT_FAILED: &str = "Could not post your comment. Please try again later.";

// =============================================================================
// LOADING
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostDetail {
    pub post: PostView,
    pub likes: Vec<LikeView>,
    pub comments: Vec<CommentView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostDetailPage {
    pub slug: String,
}

impl PostDetailPage {
    /// Build from the page's `slug` query value; `None` when it is absent or
    /// empty, in which case the page shows [`MISSING_SLUG`] and loads nothing.
    #[must_use]
    pub fn from_query(slug: Option<&str>) -> Option<Self> {
        slug.filter(|s| !s.trim().is_empty())
            .map(|s| Self { slug: s.to_owned() })
    }
}

#[async_trait::async_trait(?Send)]
impl PageStrategy for PostDetailPage {
    type Data = PostDetail;

    fn name(&self) -> &'static str {
        "post"
    }

    async fn fetch(&self, api: &dyn BlogApi, token: &BearerToken) -> Result<PostDetail, ApiError> {
        let (post, likes, comments) = futures::try_join!(
            api.get_post(token, &self.slug),
            api.list_likes(token, &self.slug),
            api.list_comments(token, &self.slug),
        )?;
        Ok(PostDetail { post, likes, comments })
    }

    fn redirect_on_expired(&self) -> bool {
        true
    }
}

// =============================================================================
// INTERACTION
// =============================================================================

/// Request a like toggle resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LikeIntent {
    Like { profile_pic: String },
    Unlike,
}

#[derive(Clone, Debug)]
struct LikeSnapshot {
    liked: bool,
    likes: Vec<LikeView>,
}

#[derive(Clone, Debug)]
pub struct PostInteraction {
    slug: String,
    viewer: Option<Identity>,
    liked: bool,
    likes: Vec<LikeView>,
    comments: Vec<CommentView>,
    like_pending: Option<LikeSnapshot>,
    comment_in_flight: bool,
}

impl PostInteraction {
    /// Start from the loaded detail. `viewer` is the identity the page was
    /// gated on; membership is decided by display name.
    #[must_use]
    pub fn new(slug: impl Into<String>, viewer: Option<Identity>, detail: &PostDetail) -> Self {
        let liked = viewer
            .as_ref()
            .is_some_and(|v| detail.likes.iter().any(|like| like.author.name == v.name()));
        Self {
            slug: slug.into(),
            viewer,
            liked,
            likes: detail.likes.clone(),
            comments: detail.comments.clone(),
            like_pending: None,
            comment_in_flight: false,
        }
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub fn viewer(&self) -> Option<&Identity> {
        self.viewer.as_ref()
    }

    #[must_use]
    pub fn liked(&self) -> bool {
        self.liked
    }

    #[must_use]
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    #[must_use]
    pub fn likes(&self) -> &[LikeView] {
        &self.likes
    }

    #[must_use]
    pub fn comments(&self) -> &[CommentView] {
        &self.comments
    }

    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// The like control is disabled while a toggle is in flight.
    #[must_use]
    pub fn like_busy(&self) -> bool {
        self.like_pending.is_some()
    }

    #[must_use]
    pub fn comment_busy(&self) -> bool {
        self.comment_in_flight
    }

    /// Validate and apply the optimistic like/unlike.
    ///
    /// # Errors
    ///
    /// [`FlowError::SignInRequired`] without a viewer, [`FlowError::Busy`]
    /// while a previous toggle is unsettled.
    pub fn begin_like(&mut self) -> Result<LikeIntent, FlowError> {
        let viewer = self.viewer.as_ref().ok_or(FlowError::SignInRequired)?;
        if self.like_busy() {
            return Err(FlowError::Busy);
        }
        let name = viewer.name().to_owned();
        let profile_pic = viewer.avatar_url();

        self.like_pending = Some(LikeSnapshot { liked: self.liked, likes: self.likes.clone() });
        if self.liked {
            self.likes.retain(|like| like.author.name != name);
            self.liked = false;
            Ok(LikeIntent::Unlike)
        } else {
            let placeholder = LikeView {
                id: None,
                author: AuthorView { id: None, name, profile_pic: Some(profile_pic.clone()) },
            };
            self.likes.insert(0, placeholder);
            self.liked = true;
            Ok(LikeIntent::Like { profile_pic })
        }
    }

    /// Reconcile the optimistic change with the server.
    ///
    /// `Ok(Some(record))` replaces the placeholder at the head, `Ok(None)`
    /// confirms an unlike, and `Err` rolls back.
    ///
    /// # Errors
    ///
    /// Returns the failure it was given, after rolling back.
    pub fn settle_like(&mut self, outcome: Result<Option<LikeView>, FlowError>) -> Result<(), FlowError> {
        let Some(snapshot) = self.like_pending.take() else {
            return outcome.map(|_| ());
        };
        match outcome {
            Ok(Some(record)) => {
                if self.liked && !self.likes.is_empty() {
                    self.likes[0] = record;
                }
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                log::error!("like toggle on {} failed: {e}", self.slug);
                self.liked = snapshot.liked;
                self.likes = snapshot.likes;
                Err(e)
            }
        }
    }

    /// Full like/unlike cycle against the backend.
    ///
    /// Without a viewer the visitor is sent to login; an expired session
    /// schedules the same redirect after the usual delay.
    ///
    /// # Errors
    ///
    /// Any [`FlowError`] from [`Self::begin_like`] or the request.
    pub async fn toggle_like(
        &mut self,
        provider: &dyn IdentityProvider,
        api: &dyn BlogApi,
        navigator: &dyn Navigator,
    ) -> Result<(), FlowError> {
        let intent = match self.begin_like() {
            Ok(intent) => intent,
            Err(FlowError::SignInRequired) => {
                navigator.go(&Route::Login);
                return Err(FlowError::SignInRequired);
            }
            Err(e) => return Err(e),
        };
        let outcome = match self.viewer.as_ref() {
            Some(viewer) => send_like(provider, api, &self.slug, viewer, &intent).await,
            None => Err(FlowError::SignInRequired),
        };
        let result = self.settle_like(outcome);
        if matches!(result, Err(FlowError::Expired)) {
            navigator.go_after(&Route::Login, EXPIRED_REDIRECT_DELAY);
        }
        result
    }

    /// Validate a comment and mark the submit control busy. Returns the
    /// trimmed text to send.
    ///
    /// # Errors
    ///
    /// [`FlowError::SignInRequired`], [`FlowError::Busy`], or
    /// [`ValidationError::EmptyComment`] for blank input.
    pub fn begin_comment(&mut self, raw: &str) -> Result<String, FlowError> {
        if self.viewer.is_none() {
            return Err(FlowError::SignInRequired);
        }
        if self.comment_in_flight {
            return Err(FlowError::Busy);
        }
        let text = raw.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyComment.into());
        }
        self.comment_in_flight = true;
        Ok(text.to_owned())
    }

    /// Append the server's comment, or report the failure. Re-enables the
    /// submit control either way.
    ///
    /// # Errors
    ///
    /// Returns the failure it was given.
    pub fn settle_comment(&mut self, outcome: Result<CommentView, FlowError>) -> Result<(), FlowError> {
        self.comment_in_flight = false;
        match outcome {
            Ok(comment) => {
                self.comments.push(comment);
                Ok(())
            }
            Err(e) => {
                log::error!("comment on {} failed: {e}", self.slug);
                Err(e)
            }
        }
    }

    /// Full comment cycle against the backend.
    ///
    /// # Errors
    ///
    /// Any [`FlowError`] from [`Self::begin_comment`] or the request.
    pub async fn submit_comment(
        &mut self,
        provider: &dyn IdentityProvider,
        api: &dyn BlogApi,
        raw: &str,
    ) -> Result<(), FlowError> {
        let text = self.begin_comment(raw)?;
        let outcome = match self.viewer.as_ref() {
            Some(viewer) => send_comment(provider, api, &self.slug, viewer, &text).await,
            None => Err(FlowError::SignInRequired),
        };
        self.settle_comment(outcome)
    }
}

async fn token_for(provider: &dyn IdentityProvider, viewer: &Identity) -> Result<BearerToken, FlowError> {
    TokenAccessor::new(provider)
        .token_for(viewer, false)
        .await
        .ok_or(FlowError::TokenUnavailable)
}

/// The request half of a like toggle, for binders that drive
/// [`PostInteraction::begin_like`] and [`PostInteraction::settle_like`]
/// themselves.
///
/// # Errors
///
/// [`FlowError::TokenUnavailable`] or the request's failure.
pub async fn send_like(
    provider: &dyn IdentityProvider,
    api: &dyn BlogApi,
    slug: &str,
    viewer: &Identity,
    intent: &LikeIntent,
) -> Result<Option<LikeView>, FlowError> {
    let token = token_for(provider, viewer).await?;
    match intent {
        LikeIntent::Like { profile_pic } => Ok(Some(api.like(&token, slug, Some(profile_pic)).await?)),
        LikeIntent::Unlike => {
            api.unlike(&token, slug).await?;
            Ok(None)
        }
    }
}

/// The request half of a comment submission.
///
/// # Errors
///
/// [`FlowError::TokenUnavailable`] or the request's failure.
pub async fn send_comment(
    provider: &dyn IdentityProvider,
    api: &dyn BlogApi,
    slug: &str,
    viewer: &Identity,
    text: &str,
) -> Result<CommentView, FlowError> {
    let token = token_for(provider, viewer).await?;
    Ok(api.add_comment(&token, slug, text).await?)
}

// =============================================================================
// RENDERING
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArticleView {
    pub title: String,
    pub author: String,
    /// Trusted HTML from the backend.
    pub body_html: String,
    pub liked: bool,
    /// A like or unlike is in flight; the like control stays disabled.
    pub like_busy: bool,
    pub like_count: usize,
    pub comment_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Liker {
    pub name: String,
    pub avatar_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LikersPanel {
    pub heading: String,
    pub likers: Vec<Liker>,
    pub empty: Option<Notice>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentEntry {
    pub author: String,
    pub text: String,
}

/// What sits under the comment list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Composer {
    /// Comment form, labelled with who is posting.
    Form { posting_as: String, busy: bool },
    /// Link to the login page.
    SignInPrompt { href: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentsPanel {
    pub heading: String,
    pub entries: Vec<CommentEntry>,
    pub empty: Option<Notice>,
    pub composer: Composer,
}

fn author_name(author: &AuthorView) -> String {
    if author.name.is_empty() { ANONYMOUS.to_owned() } else { author.name.clone() }
}

/// Notice for the page, or `None` once the detail has loaded.
#[must_use]
pub fn render(state: &PageState<PostDetail>) -> Option<Notice> {
    state_notice(state, &POST_COPY)
}

#[must_use]
pub fn render_missing_slug() -> Notice {
    Notice::new(Tone::Error, MISSING_SLUG)
}

/// Browser tab title for a loaded post.
#[must_use]
pub fn document_title(post: &PostView) -> String {
    if post.title.trim().is_empty() { crate::pages::list::UNTITLED.to_owned() } else { post.title.clone() }
}

#[must_use]
pub fn render_article(post: &PostView, interaction: &PostInteraction) -> ArticleView {
    ArticleView {
        title: document_title(post),
        author: author_name(&post.author),
        body_html: post.content.clone(),
        liked: interaction.liked(),
        like_busy: interaction.like_busy(),
        like_count: interaction.like_count(),
        comment_count: interaction.comment_count(),
    }
}

#[must_use]
pub fn render_likers(interaction: &PostInteraction) -> LikersPanel {
    let likers: Vec<Liker> = interaction
        .likes()
        .iter()
        .map(|like| {
            let name = author_name(&like.author);
            let avatar_url = match like.author.profile_pic.as_deref() {
                Some(url) if !url.is_empty() => url.to_owned(),
                _ => fallback_avatar_url(&name),
            };
            Liker { name, avatar_url }
        })
        .collect();
    LikersPanel {
        heading: format!("Liked by ({})", likers.len()),
        empty: likers.is_empty().then(|| Notice::new(Tone::Muted, NO_LIKES)),
        likers,
    }
}

#[must_use]
pub fn render_comments(interaction: &PostInteraction) -> CommentsPanel {
    let entries: Vec<CommentEntry> = interaction
        .comments()
        .iter()
        .map(|c| CommentEntry { author: author_name(&c.author), text: c.text.clone() })
        .collect();
    let composer = match interaction.viewer() {
        Some(viewer) => Composer::Form {
            posting_as: format!("Commenting as {}", viewer.name()),
            busy: interaction.comment_busy(),
        },
        None => Composer::SignInPrompt { href: Route::Login.href() },
    };
    CommentsPanel {
        heading: format!("Comments ({})", entries.len()),
        empty: entries.is_empty().then(|| Notice::new(Tone::Muted, NO_COMMENTS)),
        entries,
        composer,
    }
}

#[cfg(test)]
#[path = "post_test.rs"]
mod tests;
