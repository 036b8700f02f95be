//! Post creation, editing, and removal on top of a [`PostStore`].

use std::sync::Arc;

use post_store::{NewPost, Post, PostChanges, PostStore, DEFAULT_STATUS};

use crate::error::BlogError;
use crate::slug::{is_valid_slug, SlugAssigner};
use crate::summary::PostSummary;

/// What an empty rich-text editor submits.
pub const EMPTY_EDITOR_CONTENT: &str = "<p><br></p>";

/// Write attempts before a slug that keeps colliding is reported as a conflict.
pub const MAX_SLUG_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub status: Option<String>,
    pub tags: Vec<String>,
    pub featured: bool,
}

impl CreatePost {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: None,
            status: None,
            tags: Vec::new(),
            featured: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePost {
    pub title: String,
    pub content: String,
    /// Explicit replacement slug. Bypasses slug derivation.
    pub slug: Option<String>,
}

impl UpdatePost {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            slug: None,
        }
    }

    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn PostStore> {
        &self.store
    }

    pub fn create(&self, input: CreatePost) -> Result<Post, BlogError> {
        let title = validated_title(&input.title)?;
        let content = validated_content(&input.content)?;
        let assigner = SlugAssigner::new(self.store.as_ref());

        let post = self.retry_on_slug_collision(&title, || {
            let slug = assigner.assign(&title, None)?;
            let new_post = NewPost {
                title: title.clone(),
                content: content.clone(),
                slug,
                author: input.author.clone(),
                status: input
                    .status
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                tags: input.tags.clone(),
                featured: input.featured,
            };
            Ok(self.store.insert(new_post)?)
        })?;

        tracing::info!(slug = %post.slug, id = %post.id, "post created");
        Ok(post)
    }

    /// Newest first.
    pub fn list(&self) -> Result<Vec<Post>, BlogError> {
        Ok(self.store.list()?)
    }

    pub fn summaries(&self) -> Result<Vec<PostSummary>, BlogError> {
        Ok(self.list()?.iter().map(PostSummary::from_post).collect())
    }

    pub fn get(&self, slug: &str) -> Result<Post, BlogError> {
        self.store
            .get_by_slug(slug)?
            .ok_or_else(|| post_not_found(slug))
    }

    pub fn update(&self, slug: &str, input: UpdatePost) -> Result<Post, BlogError> {
        let title = validated_title(&input.title)?;
        let content = validated_content(&input.content)?;
        let existing = self.get(slug)?;

        let requested = input
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|requested| !requested.is_empty());

        let post = match requested {
            Some(requested) if requested != existing.slug => {
                self.update_with_explicit_slug(slug, requested, title, content)?
            }
            Some(_) => self.update_in_place(slug, title, content)?,
            None if title != existing.title => {
                let assigner = SlugAssigner::new(self.store.as_ref());
                self.retry_on_slug_collision(&title, || {
                    let derived = assigner.assign(&title, Some(&existing.id))?;
                    let changes = PostChanges {
                        title: title.clone(),
                        content: content.clone(),
                        slug: (derived != existing.slug).then_some(derived),
                    };
                    self.store
                        .update_by_slug(slug, changes)?
                        .ok_or_else(|| post_not_found(slug))
                })?
            }
            None => self.update_in_place(slug, title, content)?,
        };

        tracing::info!(from = %slug, slug = %post.slug, id = %post.id, "post updated");
        Ok(post)
    }

    pub fn delete(&self, slug: &str) -> Result<Post, BlogError> {
        let removed = self
            .store
            .delete_by_slug(slug)?
            .ok_or_else(|| post_not_found(slug))?;
        tracing::info!(slug = %removed.slug, id = %removed.id, "post deleted");
        Ok(removed)
    }

    /// Removes every post. Returns how many were dropped.
    pub fn clear(&self) -> Result<usize, BlogError> {
        let removed = self.store.clear()?;
        tracing::info!(removed, "cleared posts");
        Ok(removed)
    }

    /// Rewrites title and content, leaving the slug untouched.
    fn update_in_place(
        &self,
        slug: &str,
        title: String,
        content: String,
    ) -> Result<Post, BlogError> {
        let changes = PostChanges {
            title,
            content,
            slug: None,
        };
        self.store
            .update_by_slug(slug, changes)?
            .ok_or_else(|| post_not_found(slug))
    }

    fn update_with_explicit_slug(
        &self,
        slug: &str,
        requested: &str,
        title: String,
        content: String,
    ) -> Result<Post, BlogError> {
        if !is_valid_slug(requested) {
            return Err(BlogError::validation(
                "Slug may only contain lowercase letters, digits, and single hyphens",
            ));
        }
        if self.store.get_by_slug(requested)?.is_some() {
            return Err(slug_conflict());
        }

        let changes = PostChanges {
            title,
            content,
            slug: Some(requested.to_string()),
        };
        match self.store.update_by_slug(slug, changes) {
            Ok(Some(post)) => Ok(post),
            Ok(None) => Err(post_not_found(slug)),
            Err(error) if error.is_slug_taken() => Err(slug_conflict()),
            Err(error) => Err(error.into()),
        }
    }

    /// Re-runs `attempt` while the store rejects its write with `SlugTaken`,
    /// which happens when a concurrent writer claimed the slug between the
    /// lookup and the write.
    fn retry_on_slug_collision<T>(
        &self,
        title: &str,
        mut attempt: impl FnMut() -> Result<T, BlogError>,
    ) -> Result<T, BlogError> {
        for attempt_number in 1..=MAX_SLUG_ATTEMPTS {
            match attempt() {
                Err(BlogError::Storage(error)) if error.is_slug_taken() => {
                    tracing::warn!(%title, attempt = attempt_number, %error, "slug claimed concurrently, reassigning");
                }
                other => return other,
            }
        }

        Err(slug_conflict())
    }
}

fn validated_title(title: &str) -> Result<String, BlogError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(BlogError::validation("Title is required"));
    }
    Ok(title.to_string())
}

fn validated_content(content: &str) -> Result<String, BlogError> {
    let content = content.trim();
    if content.is_empty() || content == EMPTY_EDITOR_CONTENT {
        return Err(BlogError::validation("Content is required"));
    }
    Ok(content.to_string())
}

fn post_not_found(slug: &str) -> BlogError {
    BlogError::not_found(format!("Post not found: {slug}"))
}

fn slug_conflict() -> BlogError {
    BlogError::conflict("A post with this slug already exists")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_and_required() {
        assert_eq!(validated_title("  Hi  ").expect("valid"), "Hi");
        assert!(matches!(validated_title("   "), Err(BlogError::Validation(_))));
    }

    #[test]
    fn placeholder_content_is_rejected() {
        assert!(matches!(
            validated_content("<p><br></p>"),
            Err(BlogError::Validation(_))
        ));
        assert!(matches!(
            validated_content("  <p><br></p>\n"),
            Err(BlogError::Validation(_))
        ));
        assert!(matches!(validated_content(""), Err(BlogError::Validation(_))));
        assert_eq!(
            validated_content(" <p>ok</p> ").expect("valid"),
            "<p>ok</p>"
        );
    }
}
