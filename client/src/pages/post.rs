//! Single post: article, likers, comments.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page reads `?slug=` and runs the gated detail load. Once loaded, the
//! like and comment controls drive a core `PostInteraction` in two halves
//! (begin synchronously inside the signal, send, settle) so no signal borrow
//! is held across a network await.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use postgate::error::FlowError;
use postgate::loader::PageState;
use postgate::navigation::{Navigator, Route};
use postgate::pages::post::{
    self, COMMENT_FAILED, Composer, LIKE_FAILED, LIKE_SIGN_IN, POST_COPY, PostDetail, PostDetailPage, PostInteraction,
};

use crate::components::notice::NoticeLine;
use crate::state::session::{Session, use_session};
use crate::util::browser::alert;

/// Label of the like toggle.
pub fn like_button_label(liked: bool) -> &'static str {
    if liked { "Unlike" } else { "Like" }
}

/// Alert text for a failed like or comment, or `None` when nothing should be
/// shown (a busy control just ignores the click).
pub fn failure_alert(error: &FlowError, fallback: &str) -> Option<String> {
    match error {
        FlowError::Busy => None,
        FlowError::Expired => Some(POST_COPY.expired.to_owned()),
        FlowError::Validation(e) => Some(e.to_string()),
        FlowError::SignInRequired | FlowError::TokenUnavailable => Some(error.to_string()),
        FlowError::Request(_) => Some(fallback.to_owned()),
    }
}

fn report_failure(session: &Session, error: &FlowError, fallback: &str) {
    if matches!(error, FlowError::Expired) {
        session.navigator.go_after(&Route::Login, session.config.expired_redirect_delay);
    }
    if let Some(message) = failure_alert(error, fallback) {
        alert(&message);
    }
}

#[component]
pub fn PostPage() -> impl IntoView {
    let session = use_session();
    let query = use_query_map();
    let page = query.with_untracked(|q| PostDetailPage::from_query(q.get("slug").as_deref()));
    let missing_slug = page.is_none();

    let state = RwSignal::new(PageState::<PostDetail>::Pending);
    let interaction = RwSignal::new(None::<PostInteraction>);
    let comment_text = RwSignal::new(String::new());

    #[cfg(feature = "hydrate")]
    {
        let session = session.clone();
        leptos::task::spawn_local(async move {
            let Some(page) = page else {
                log::error!("post page opened without a slug");
                return;
            };
            let run = session.loader().run(&page, |next| state.set(next.clone())).await;
            if let PageState::Loaded(detail) = &run.state {
                crate::util::browser::set_document_title(&post::document_title(&detail.post));
                let viewer = run.identity.identity().cloned();
                interaction.set(Some(PostInteraction::new(page.slug.clone(), viewer, detail)));
            }
        });
    }

    let like_session = session.clone();
    let on_like = move |_| {
        let begun = interaction.try_update(|slot| slot.as_mut().map(PostInteraction::begin_like)).flatten();
        let intent = match begun {
            None => return,
            Some(Ok(intent)) => intent,
            Some(Err(FlowError::SignInRequired)) => {
                alert(LIKE_SIGN_IN);
                like_session.navigator.go(&Route::Login);
                return;
            }
            Some(Err(e)) => {
                report_failure(&like_session, &e, LIKE_FAILED);
                return;
            }
        };
        let Some((slug, viewer)) = interaction.with_untracked(|slot| {
            slot.as_ref().and_then(|i| i.viewer().cloned().map(|viewer| (i.slug().to_owned(), viewer)))
        }) else {
            return;
        };
        let session = like_session.clone();
        leptos::task::spawn_local(async move {
            let outcome =
                post::send_like(session.provider.as_ref(), session.api.as_ref(), &slug, &viewer, &intent).await;
            let settled = interaction.try_update(|slot| slot.as_mut().map(|i| i.settle_like(outcome)));
            if let Some(Some(Err(e))) = settled {
                report_failure(&session, &e, LIKE_FAILED);
            }
        });
    };

    let comment_session = session.clone();
    let on_comment = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let raw = comment_text.get_untracked();
        let begun = interaction.try_update(|slot| slot.as_mut().map(|i| i.begin_comment(&raw))).flatten();
        let text = match begun {
            None => return,
            Some(Ok(text)) => text,
            Some(Err(e)) => {
                report_failure(&comment_session, &e, COMMENT_FAILED);
                return;
            }
        };
        let Some((slug, viewer)) = interaction.with_untracked(|slot| {
            slot.as_ref().and_then(|i| i.viewer().cloned().map(|viewer| (i.slug().to_owned(), viewer)))
        }) else {
            return;
        };
        let session = comment_session.clone();
        leptos::task::spawn_local(async move {
            let outcome =
                post::send_comment(session.provider.as_ref(), session.api.as_ref(), &slug, &viewer, &text).await;
            let settled = interaction.try_update(|slot| slot.as_mut().map(|i| i.settle_comment(outcome)));
            match settled {
                Some(Some(Ok(()))) => comment_text.set(String::new()),
                Some(Some(Err(e))) => report_failure(&session, &e, COMMENT_FAILED),
                _ => {}
            }
        });
    };

    let notice = move || {
        if missing_slug {
            return Some(post::render_missing_slug());
        }
        state.with(post::render)
    };

    let detail = move || {
        let article_post = state.with(|s| s.loaded().map(|d| d.post.clone()))?;
        interaction.with(|slot| {
            slot.as_ref().map(|i| {
                (post::render_article(&article_post, i), post::render_likers(i), post::render_comments(i))
            })
        })
    };

    view! {
        <section class="post-page">
            {move || notice().map(|notice| view! { <NoticeLine notice=notice/> })}
            {move || {
                detail()
                    .map(|(article, likers, comments)| {
                        let composer = match comments.composer {
                            Composer::Form { posting_as, busy } => view! {
                                <form class="comment-form" on:submit=on_comment.clone()>
                                    <label class="comment-form__label">{posting_as}</label>
                                    <textarea
                                        class="comment-form__input"
                                        prop:value=move || comment_text.get()
                                        on:input=move |ev| comment_text.set(event_target_value(&ev))
                                    ></textarea>
                                    <button class="comment-form__submit" type="submit" disabled=busy>
                                        "Post comment"
                                    </button>
                                </form>
                            }
                            .into_any(),
                            Composer::SignInPrompt { href } => view! {
                                <p class="comment-form__prompt">
                                    "Please " <a href=href>"sign in"</a> " to leave a comment."
                                </p>
                            }
                            .into_any(),
                        };
                        view! {
                            <article class="post">
                                <h1 class="post__title">{article.title}</h1>
                                <p class="post__author">"By " {article.author}</p>
                                <div class="post__body" inner_html=article.body_html></div>
                                <div class="post__stats">
                                    <button class="post__like" on:click=on_like.clone() disabled=article.like_busy>
                                        {like_button_label(article.liked)}
                                    </button>
                                    <span class="post__like-count">{article.like_count}</span>
                                    <span class="post__comment-count">{article.comment_count}</span>
                                </div>
                            </article>
                            <aside class="likers">
                                <h2>{likers.heading}</h2>
                                {likers.empty.map(|notice| view! { <NoticeLine notice=notice/> })}
                                <ul class="likers__list">
                                    {likers
                                        .likers
                                        .into_iter()
                                        .map(|liker| {
                                            view! {
                                                <li class="likers__item">
                                                    <img class="likers__avatar" src=liker.avatar_url alt=""/>
                                                    <span>{liker.name}</span>
                                                </li>
                                            }
                                        })
                                        .collect_view()}
                                </ul>
                            </aside>
                            <section class="comments">
                                <h2>{comments.heading}</h2>
                                {comments.empty.map(|notice| view! { <NoticeLine notice=notice/> })}
                                <ul class="comments__list">
                                    {comments
                                        .entries
                                        .into_iter()
                                        .map(|entry| {
                                            view! {
                                                <li class="comments__item">
                                                    <strong>{entry.author}</strong>
                                                    <p>{entry.text}</p>
                                                </li>
                                            }
                                        })
                                        .collect_view()}
                                </ul>
                                {composer}
                            </section>
                        }
                    })
            }}
        </section>
    }
}

#[cfg(test)]
#[path = "post_test.rs"]
mod post_test;
