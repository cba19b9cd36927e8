//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render page chrome (navigation, notices) from core view
//! descriptions and the session context.

pub mod navbar;
pub mod notice;
