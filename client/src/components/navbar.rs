//! Top navigation bar driven by the identity gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gate writes [`NavSignals`](crate::state::session::NavSignals) on every
//! identity notification. This component only reflects them: auth links for
//! visitors, a welcome line and logout button for signed-in users.

use leptos::prelude::*;
use postgate::navigation::Route;

use crate::state::session::use_session;
use crate::util::browser::alert;

#[component]
pub fn Navbar() -> impl IntoView {
    let session = use_session();
    let nav = session.nav;

    let show_auth_links = move || nav.view.get().show_auth_links;
    let welcome = move || nav.view.get().welcome;

    let on_logout = move |_| {
        // Clicks before the gate has bound the control do nothing.
        if !nav.logout_bound.get_untracked() {
            return;
        }
        let session = session.clone();
        leptos::task::spawn_local(async move {
            let result =
                postgate::gate::logout(session.provider.as_ref(), session.store.as_ref(), &session.navigator).await;
            if let Err(e) = result {
                alert(&format!("Logout failed: {e}"));
            }
        });
    };

    view! {
        <nav class="navbar">
            <a class="navbar__brand" href=Route::Home.href()>"Postgate"</a>
            <a class="navbar__link" href=Route::Chat.href()>"Chat"</a>
            <div class="navbar__spacer"></div>
            <Show when=show_auth_links>
                <a class="navbar__link" href=Route::Login.href()>"Login"</a>
                <a class="navbar__link" href=Route::Register.href()>"Register"</a>
            </Show>
            <Show when=move || welcome().is_some()>
                <span class="navbar__welcome">{move || welcome().unwrap_or_default()}</span>
                <button class="navbar__logout" on:click=on_logout.clone()>"Logout"</button>
            </Show>
        </nav>
    }
}
