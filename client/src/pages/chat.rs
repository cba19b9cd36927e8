//! Chat page: one gated request/response per message.
//!
//! SYSTEM CONTEXT
//! ==============
//! The input stays behind a sign-in overlay until the identity gate reports a
//! signed-in user. Each send runs the core loader with a chat strategy, so an
//! expired session redirects to login the same way the post page does.

use leptos::prelude::*;
use postgate::error::FlowError;
use postgate::pages::chat::{CHAT_SIGNED_OUT, ChatSendStrategy, ChatSession, Speaker};

use crate::state::session::use_session;
use crate::util::browser::alert;

pub fn speaker_class(speaker: Speaker, pending: bool) -> &'static str {
    match (speaker, pending) {
        (Speaker::User, _) => "chat-line chat-line--user",
        (Speaker::Assistant, false) => "chat-line chat-line--assistant",
        (Speaker::Assistant, true) => "chat-line chat-line--assistant chat-line--pending",
    }
}

#[component]
pub fn ChatPage() -> impl IntoView {
    let session = use_session();
    let chat = RwSignal::new(ChatSession::new());
    let draft = RwSignal::new(String::new());

    #[cfg(feature = "hydrate")]
    {
        let gate = session.gate.clone();
        leptos::task::spawn_local(async move {
            let ready = gate.on_ready().await;
            chat.update(|c| c.apply_ready(&ready));
        });
    }

    let on_send = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let raw = draft.get_untracked();
        let Some(begun) = chat.try_update(|c| c.begin_send(&raw)) else {
            return;
        };
        let message = match begun {
            Ok(message) => message,
            Err(FlowError::Busy) => return,
            Err(e) => {
                alert(&e.to_string());
                return;
            }
        };
        draft.set(String::new());
        let session = session.clone();
        leptos::task::spawn_local(async move {
            let run = session.loader().run(&ChatSendStrategy { message }, |_| {}).await;
            chat.update(|c| c.finish_send(&run.state));
        });
    };

    let lines = move || {
        chat.with(|c| {
            c.lines()
                .iter()
                .map(|line| {
                    let class = speaker_class(line.speaker, line.pending);
                    let text = line.text.clone();
                    view! { <li class=class>{text}</li> }
                })
                .collect_view()
        })
    };

    view! {
        <section class="chat-page">
            <h1>"Chat"</h1>
            <div class="chat-panel">
                <Show when=move || chat.with(ChatSession::overlay_visible)>
                    <div class="chat-overlay">
                        <p>{CHAT_SIGNED_OUT}</p>
                        <a href=postgate::navigation::Route::Login.href()>"Sign in"</a>
                    </div>
                </Show>
                <ul class="chat-lines">{lines}</ul>
                <form class="chat-form" on:submit=on_send>
                    <input
                        class="chat-form__input"
                        type="text"
                        placeholder="Ask something..."
                        disabled=move || !chat.with(ChatSession::input_enabled)
                        prop:value=move || draft.get()
                        on:input=move |ev| draft.set(event_target_value(&ev))
                    />
                    <button
                        class="chat-form__send"
                        type="submit"
                        disabled=move || !chat.with(ChatSession::input_enabled)
                    >
                        "Send"
                    </button>
                </form>
            </div>
        </section>
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;
