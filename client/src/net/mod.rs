//! Networking for the browser build.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` implements the backend contract with `gloo-net`, `transport` gives
//! the identity provider its POST primitive, and `timeout` bounds both.

pub mod http;
pub mod timeout;
pub mod transport;
