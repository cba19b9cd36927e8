//! Registration page: account creation plus nickname.
//!
//! Validation runs before any provider call, in the order the core defines
//! (nickname, confirmation, length), so only the first problem is shown.

use leptos::prelude::*;
use postgate::forms::{self, REGISTERED, RegistrationForm};
use postgate::navigation::Route;

use crate::state::session::use_session;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = use_session();
    let email = RwSignal::new(String::new());
    let nickname = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = RegistrationForm {
            email: email.get_untracked(),
            nickname: nickname.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
        };
        if let Err(e) = form.validate() {
            info.set(e.to_string());
            return;
        }
        busy.set(true);
        info.set("Creating your account...".to_owned());

        let session = session.clone();
        leptos::task::spawn_local(async move {
            match forms::register(session.provider.as_ref(), session.store.as_ref(), &session.navigator, &form).await {
                Ok(_) => info.set(REGISTERED.to_owned()),
                Err(e) => {
                    info.set(forms::registration_error_message(&e));
                    busy.set(false);
                }
            }
        });
    };

    let field = move |kind: &'static str, placeholder: &'static str, value: RwSignal<String>| {
        view! {
            <input
                class="auth-input"
                type=kind
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Create an account"</h1>
                <form class="auth-form" on:submit=on_submit>
                    {field("email", "you@example.com", email)}
                    {field("text", "Nickname", nickname)}
                    {field("password", "Password", password)}
                    {field("password", "Confirm password", confirm_password)}
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <p class="auth-card__footer">
                    "Already registered? " <a href=Route::Login.href()>"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
