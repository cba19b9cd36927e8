//! Per-page strategies, interactive state, and pure render functions.
//!
//! Each page pairs a [`crate::loader::PageStrategy`] (what to fetch) with a
//! render function from [`crate::loader::PageState`] to a plain view value.
//! Binders in the front ends apply those values; nothing here touches a DOM
//! or a terminal.

pub mod chat;
pub mod list;
pub mod post;

pub use chat::{ChatLine, ChatSendStrategy, ChatSession, Speaker};
pub use list::{PostCard, PostListPage, PostListView};
pub use post::{PostDetail, PostDetailPage, PostInteraction};
