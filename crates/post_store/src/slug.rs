use regex::{Regex, RegexBuilder};

use crate::error::PostStoreError;

pub const MAX_SLUG_LEN: usize = 200;

/// Lowercase ASCII letters and digits joined by single hyphens, no hyphen at
/// either end.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return false;
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Matches `base` optionally followed by a numeric suffix, ignoring case.
pub fn slug_pattern(base: &str) -> Result<Regex, PostStoreError> {
    RegexBuilder::new(&format!("^{}(-[0-9]+)?$", regex::escape(base)))
        .case_insensitive(true)
        .build()
        .map_err(|source| PostStoreError::Pattern {
            base: base.to_string(),
            source,
        })
}
