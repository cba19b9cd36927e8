//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns its signals and the async glue around a core loader or
//! form; everything it shows comes from the core's render functions.

pub mod chat;
pub mod login;
pub mod post;
pub mod posts;
pub mod register;
