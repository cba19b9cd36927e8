//! # postgate
//!
//! Client-side auth-state synchronization and token-gated data loading for a
//! login-gated blog: post list, post detail with likes and comments, and a
//! chat panel, backed by an external identity provider and a REST backend.
//!
//! ARCHITECTURE
//! ============
//! ```text
//! IdentityProvider ──notifications──▶ IdentityGate ──▶ NavBinder (navbar)
//!        │                                 │
//!        │                            on_ready()
//!        ▼                                 ▼
//!   TokenAccessor ◀──────────────── GatedPageLoader ──▶ BlogApi
//!                                          │
//!                                   PageState ─▶ pages::*::render
//! ```
//!
//! Nothing in this crate touches a DOM, a terminal, or a concrete HTTP
//! stack. The `client` crate binds it to the browser; the `cli` crate binds
//! it to a terminal.

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod gate;
pub mod hints;
pub mod identity;
pub mod latch;
pub mod loader;
pub mod navigation;
pub mod pages;
pub mod token;
pub mod toolkit;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
