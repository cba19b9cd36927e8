//! # postgate-client
//!
//! Leptos + WASM front end for the postgate blog.
//!
//! This crate only binds the `postgate` core to the browser: signals for the
//! navbar and page states, `gloo-net` for HTTP, `localStorage` for session
//! persistence. Gating, loading, and rendering decisions all live in the core.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
