//! Login page: email + password against the identity provider.

use leptos::prelude::*;
use postgate::forms::{self, LoginForm};
use postgate::navigation::Route;

use crate::state::session::use_session;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = LoginForm { email: email.get_untracked(), password: password.get_untracked() };
        if let Err(e) = form.validate() {
            info.set(e.to_string());
            return;
        }
        busy.set(true);
        info.set("Signing in...".to_owned());

        let session = session.clone();
        leptos::task::spawn_local(async move {
            let result =
                forms::sign_in(session.provider.as_ref(), session.store.as_ref(), &session.navigator, &form).await;
            if let Err(e) = result {
                info.set(forms::login_error_message(&e));
                busy.set(false);
            }
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign in"</h1>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        "Sign in"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <p class="auth-card__footer">
                    "No account yet? " <a href=Route::Register.href()>"Register"</a>
                </p>
            </div>
        </div>
    }
}
