//! Root application component with routing and the session context.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::navbar::Navbar;
use crate::pages::{chat::ChatPage, login::LoginPage, post::PostPage, posts::PostsPage, register::RegisterPage};
use crate::state::session::Session;
use crate::util::browser::API_KEY_META;

/// HTML shell rendered on the server for SSR + hydration.
///
/// The provider API key travels to the browser in a `<meta>` tag read by
/// [`crate::util::browser::api_key`].
pub fn shell(options: LeptosOptions) -> impl IntoView {
    let api_key = std::env::var(postgate::config::API_KEY_VAR).unwrap_or_default();
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <meta name=API_KEY_META content=api_key/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Builds the [`Session`] (provider, gate, backend client), provides it to
/// every page, and starts the provider once the app is live in the browser.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = Session::from_browser();
    provide_context(session.clone());

    // The first identity notification must arrive after hydration so the
    // server-rendered "resolving session" markup matches.
    Effect::new(move || session.provider.start());

    view! {
        <Stylesheet id="leptos" href="/pkg/postgate.css"/>
        <Title text="Postgate"/>

        <Router>
            <Navbar/>
            <main class="page">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=PostsPage/>
                    <Route path=StaticSegment("post") view=PostPage/>
                    <Route path=StaticSegment("chat") view=ChatPage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                </Routes>
            </main>
        </Router>
    }
}
