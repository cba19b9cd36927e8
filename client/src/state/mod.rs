//! Shared client-side state.
//!
//! DESIGN
//! ======
//! Page-level state lives in each page as plain signals over core types;
//! only the session context is shared.

pub mod session;
