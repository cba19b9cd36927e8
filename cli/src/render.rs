//! Plain-text rendering of the core's view descriptions.

use postgate::pages::chat::{ChatLine, Speaker};
use postgate::pages::list::PostListView;
use postgate::pages::post::{ArticleView, Composer, CommentsPanel, LikersPanel};
use postgate::view::{Notice, Tone};

pub fn notice_line(notice: &Notice) -> String {
    match notice.tone {
        Tone::Error => format!("error: {}", notice.text),
        Tone::Prompt => format!("! {}", notice.text),
        Tone::Info | Tone::Muted => notice.text.clone(),
    }
}

pub fn post_list_lines(view: &PostListView) -> Vec<String> {
    match view {
        PostListView::Notice(notice) => vec![notice_line(notice)],
        PostListView::Cards(cards) => cards
            .iter()
            .map(|card| format!("{}  by {}  ({})", card.title, card.author, card.href))
            .collect(),
    }
}

pub fn post_detail_lines(article: &ArticleView, likers: &LikersPanel, comments: &CommentsPanel) -> Vec<String> {
    let mut lines = vec![
        article.title.clone(),
        format!("by {}", article.author),
        String::new(),
        article.body_html.clone(),
        String::new(),
        format!(
            "{} likes, {} comments{}",
            article.like_count,
            article.comment_count,
            if article.liked { " (you like this)" } else { "" }
        ),
        String::new(),
        likers.heading.clone(),
    ];
    lines.extend(likers.empty.iter().map(notice_line));
    lines.extend(likers.likers.iter().map(|liker| format!("  {}", liker.name)));

    lines.push(String::new());
    lines.push(comments.heading.clone());
    lines.extend(comments.empty.iter().map(notice_line));
    lines.extend(comments.entries.iter().map(|entry| format!("  {}: {}", entry.author, entry.text)));
    if let Composer::SignInPrompt { href } = &comments.composer {
        lines.push(format!("Sign in to comment ({href})."));
    }
    lines
}

pub fn chat_line(line: &ChatLine) -> String {
    match line.speaker {
        Speaker::User => format!("you: {}", line.text),
        Speaker::Assistant => format!("assistant: {}", line.text),
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
