//! Home page: gated list of posts.

use leptos::prelude::*;
use postgate::api::PostView;
use postgate::loader::PageState;
use postgate::pages::list::{self, PostListView};

use crate::components::notice::NoticeLine;
use crate::state::session::use_session;

#[component]
pub fn PostsPage() -> impl IntoView {
    let session = use_session();
    let state = RwSignal::new(PageState::<Vec<PostView>>::Pending);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        session
            .loader()
            .run(&list::PostListPage, |next| state.set(next.clone()))
            .await;
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = session;

    let body = move || match state.with(list::render) {
        PostListView::Notice(notice) => view! { <NoticeLine notice=notice/> }.into_any(),
        PostListView::Cards(cards) => view! {
            <ul class="post-list">
                {cards
                    .into_iter()
                    .map(|card| {
                        view! {
                            <li class="post-card">
                                <a class="post-card__title" href=card.href>{card.title}</a>
                                <span class="post-card__author">{card.author}</span>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        }
        .into_any(),
    };

    view! {
        <section class="posts-page">
            <h1>"Posts"</h1>
            {body}
        </section>
    }
}
