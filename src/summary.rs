//! Plain-text helpers for post listings.

use std::sync::OnceLock;

use post_store::Post;
use regex::Regex;
use serde::Serialize;
use time::macros::format_description;
use time::OffsetDateTime;

pub const DEFAULT_EXCERPT_CHARS: usize = 150;
pub const WORDS_PER_MINUTE: usize = 200;

fn tag_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag regex must compile"))
}

#[must_use]
pub fn strip_tags(html: &str) -> String {
    tag_regex().replace_all(html, "").into_owned()
}

/// First `max_chars` characters of the text, with `...` when cut short.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head.trim())
}

#[must_use]
pub fn excerpt(html: &str, max_chars: usize) -> String {
    truncate_text(&strip_tags(html), max_chars)
}

/// Whole minutes, rounded up. Zero when there are no words.
#[must_use]
pub fn reading_time_minutes(html: &str) -> usize {
    let words = strip_tags(html).split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE)
}

/// `October 17, 2026`.
#[must_use]
pub fn format_date(date: OffsetDateTime) -> String {
    let format = format_description!("[month repr:long] [day padding:none], [year]");
    date.format(&format).unwrap_or_else(|_| date.date().to_string())
}

/// Card data for a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub reading_time_minutes: usize,
    pub published_on: String,
    pub featured: bool,
    pub tags: Vec<String>,
}

impl PostSummary {
    #[must_use]
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: excerpt(&post.content, DEFAULT_EXCERPT_CHARS),
            reading_time_minutes: reading_time_minutes(&post.content),
            published_on: format_date(post.created_at),
            featured: post.featured,
            tags: post.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn strips_markup() {
        assert_eq!(
            strip_tags("<h2>Hi</h2><p>there <code>x</code></p>"),
            "Hithere x"
        );
    }

    #[test]
    fn excerpt_truncates_on_characters() {
        assert_eq!(excerpt("<p>short</p>", 150), "short");
        assert_eq!(excerpt("<p>hello world</p>", 6), "hello...");
        assert_eq!(excerpt("<p>ééééé</p>", 3), "ééé...");
    }

    #[test]
    fn reading_time_rounds_up() {
        assert_eq!(reading_time_minutes(""), 0);
        assert_eq!(reading_time_minutes("<p>one two</p>"), 1);
        let long = format!("<p>{}</p>", "word ".repeat(201));
        assert_eq!(reading_time_minutes(&long), 2);
    }

    #[test]
    fn formats_long_month_dates() {
        assert_eq!(format_date(datetime!(2026-10-07 12:00 UTC)), "October 7, 2026");
    }
}
