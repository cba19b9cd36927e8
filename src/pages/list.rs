//! Post list page.

use crate::api::{ApiError, BlogApi, PostView};
use crate::loader::{PageState, PageStrategy};
use crate::navigation::Route;
use crate::token::BearerToken;
use crate::view::{Notice, PageCopy, Tone, state_notice};

pub const LIST_COPY: PageCopy = PageCopy {
    signed_out: "Please sign in to see the posts.",
    loading: "Signed in, loading posts...",
    expired: "Your session has expired. Please sign in again to see the posts.",
    error_prefix: "Failed to load posts",
};

pub const NO_POSTS: &str = "No posts yet.";
pub const UNTITLED: &str = "Untitled";

pub struct PostListPage;

#[async_trait::async_trait(?Send)]
impl PageStrategy for PostListPage {
    type Data = Vec<PostView>;

    fn name(&self) -> &'static str {
        "posts"
    }

    async fn fetch(&self, api: &dyn BlogApi, token: &BearerToken) -> Result<Vec<PostView>, ApiError> {
        api.list_posts(token).await
    }
}

/// One entry in the post grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostCard {
    pub href: String,
    pub title: String,
    pub author: String,
}

impl PostCard {
    #[must_use]
    pub fn from_post(post: &PostView) -> Self {
        let title = if post.title.trim().is_empty() { UNTITLED } else { post.title.as_str() };
        Self {
            href: Route::Post { slug: post.slug.clone() }.href(),
            title: title.to_owned(),
            author: post.author.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostListView {
    Notice(Notice),
    Cards(Vec<PostCard>),
}

#[must_use]
pub fn render(state: &PageState<Vec<PostView>>) -> PostListView {
    if let Some(notice) = state_notice(state, &LIST_COPY) {
        return PostListView::Notice(notice);
    }
    match state.loaded() {
        Some(posts) if !posts.is_empty() => PostListView::Cards(posts.iter().map(PostCard::from_post).collect()),
        _ => PostListView::Notice(Notice::new(Tone::Muted, NO_POSTS)),
    }
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
