use chrono::DateTime;

use crate::domain::{Article, Direction, Phase};
use crate::paging::PagingSnapshot;

/// Title and body of each onboarding screen, shown once on first launch.
pub const ONBOARDING_PAGES: [(&str, &str); 3] = [
    (
        "Stay on top of the news",
        "Browse the latest articles from the sources you follow, one screen at a time.",
    ),
    (
        "Find what matters",
        "Search every source at once and page through the results as you read.",
    ),
    (
        "Keep it for later",
        "Bookmark any article and read it again offline whenever you like.",
    ),
];

pub const NO_BOOKMARKS: &str = "You have not saved news so far !";

/// `2024-05-01T10:00:00Z` becomes `May 1, 2024 10:00`. Anything that isn't
/// RFC 3339 is shown as-is.
pub fn format_published(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%b %-d, %Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// One entry of a numbered article list.
pub fn article_line(number: usize, article: &Article, saved: bool) -> String {
    let marker = if saved { "*" } else { " " };
    let mut meta = Vec::new();
    if !article.source.name.is_empty() {
        meta.push(article.source.name.clone());
    }
    if !article.published_at.is_empty() {
        meta.push(format_published(&article.published_at));
    }

    if meta.is_empty() {
        format!("{:>4}.{} {}", number, marker, article.title)
    } else {
        format!(
            "{:>4}.{} {}\n        {}",
            number,
            marker,
            article.title,
            meta.join(" | ")
        )
    }
}

pub fn article_details(article: &Article) -> String {
    let mut out = vec![article.title.clone(), String::new()];

    let fields = [
        ("Source", article.source.name.clone()),
        ("Author", article.author.clone()),
        ("Published", format_published(&article.published_at)),
        ("URL", article.url.clone()),
        ("Image", article.url_to_image.clone()),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            out.push(format!("  {}: {}", label, value));
        }
    }

    for text in [&article.description, &article.content] {
        if !text.is_empty() {
            out.push(String::new());
            out.push(text.clone());
        }
    }

    out.join("\n")
}

/// Footer describing what the feed is doing, if anything worth saying.
pub fn status_line(snapshot: &PagingSnapshot) -> Option<String> {
    match snapshot.phase {
        Phase::Idle | Phase::Ready => None,
        Phase::Loading(_) => Some("Loading...".to_string()),
        Phase::Error(direction) => {
            let message = snapshot
                .load_states
                .get(direction)
                .error()
                .map(|e| e.user_message())
                .unwrap_or("Unknown Error.");
            let hint = match direction {
                Direction::Refresh => "press r to retry",
                _ => "press r to retry loading more",
            };
            Some(format!("{} ({})", message, hint))
        }
        Phase::Exhausted if snapshot.is_empty() => Some("No articles found.".to_string()),
        Phase::Exhausted => Some("No more articles.".to_string()),
    }
}
