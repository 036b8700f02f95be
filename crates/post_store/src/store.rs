use crate::error::PostStoreError;
use crate::schema::{NewPost, Post, PostChanges, SlugMatch};

/// Persistence contract the post service and slug assigner depend on.
///
/// Every backend enforces slug uniqueness on `insert` and `update_by_slug`;
/// a collision is reported as [`PostStoreError::SlugTaken`].
pub trait PostStore: Send + Sync {
    /// Posts whose slug is `base` or `base-<digits>`, case-insensitively.
    fn find_matching_slugs(&self, base: &str) -> Result<Vec<SlugMatch>, PostStoreError>;

    fn insert(&self, post: NewPost) -> Result<Post, PostStoreError>;

    fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, PostStoreError>;

    /// All posts, newest first.
    fn list(&self) -> Result<Vec<Post>, PostStoreError>;

    /// Returns `Ok(None)` when no post has `slug`.
    fn update_by_slug(
        &self,
        slug: &str,
        changes: PostChanges,
    ) -> Result<Option<Post>, PostStoreError>;

    /// Returns the removed post, or `Ok(None)` when no post has `slug`.
    fn delete_by_slug(&self, slug: &str) -> Result<Option<Post>, PostStoreError>;

    /// Removes every post and returns how many were dropped.
    fn clear(&self) -> Result<usize, PostStoreError>;
}
