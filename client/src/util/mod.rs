//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (storage, location, timers,
//! document metadata) so pages only deal with core types and signals.

pub mod browser;
pub mod storage;
