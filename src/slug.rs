//! Slug derivation and collision resolution.

use std::collections::HashSet;
use std::sync::OnceLock;

use post_store::{PostId, PostStore, SlugMatch};
use regex::Regex;

use crate::error::BlogError;

pub use post_store::is_valid_slug;

/// Longest base slug derived from a title, leaving room for a `-N` suffix.
pub const MAX_BASE_SLUG_LEN: usize = 180;

fn separator_run_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| Regex::new(r"[\s-]+").expect("separator regex must compile"))
}

/// Lowercases `title`, drops everything outside `[a-z0-9]`, whitespace and
/// `-` (which removes `* + ~ . ( ) ' " ! : @` among others), and joins the
/// remaining words with single hyphens.
///
/// Returns an empty string when nothing usable survives.
#[must_use]
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();
    let joined = separator_run_regex().replace_all(&kept, "-");
    let trimmed = joined.trim_matches('-');

    if trimmed.len() <= MAX_BASE_SLUG_LEN {
        return trimmed.to_string();
    }
    trimmed[..MAX_BASE_SLUG_LEN].trim_end_matches('-').to_string()
}

/// Picks a slug for `base` given every post already in its `base(-N)?` family.
///
/// - No other post in the family: `base`.
/// - The excluded post is in the family alongside others: its current slug,
///   which is already unique.
/// - Otherwise `base-{N+1}` with N the family size, stepping upward past any
///   suffix that is already taken.
#[must_use]
pub fn resolve_slug(base: &str, matches: &[SlugMatch], exclude_id: Option<&PostId>) -> String {
    let is_excluded = |found: &&SlugMatch| exclude_id == Some(&found.id);

    let taken: HashSet<String> = matches
        .iter()
        .filter(|found| !is_excluded(found))
        .map(|found| found.slug.to_ascii_lowercase())
        .collect();
    if taken.is_empty() {
        return base.to_string();
    }

    if let Some(own) = matches.iter().find(is_excluded) {
        return own.slug.clone();
    }

    let mut suffix = matches.len() + 1;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Derives unique slugs against a live store.
///
/// The check is a read; uniqueness is only guaranteed at the instant of the
/// query. Callers writing the result must handle the store's
/// `SlugTaken` rejection.
pub struct SlugAssigner<'a, S: PostStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: PostStore + ?Sized> SlugAssigner<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn assign(&self, title: &str, exclude_id: Option<&PostId>) -> Result<String, BlogError> {
        let base = slugify(title);
        if base.is_empty() {
            return Err(BlogError::validation("Title produces no usable slug"));
        }

        let matches = self.store.find_matching_slugs(&base)?;
        let slug = resolve_slug(&base, &matches, exclude_id);
        if slug != base {
            tracing::debug!(%base, %slug, family = matches.len(), "slug collision resolved");
        }
        Ok(slug)
    }
}
