//! One-line status notice.

use leptos::prelude::*;
use postgate::view::Notice;

#[component]
pub fn NoticeLine(notice: Notice) -> impl IntoView {
    view! { <p class=notice.tone.css_class()>{notice.text}</p> }
}
