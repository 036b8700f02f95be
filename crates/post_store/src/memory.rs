use std::sync::Mutex;

use time::OffsetDateTime;

use crate::error::PostStoreError;
use crate::lock_unpoisoned;
use crate::schema::{NewPost, Post, PostChanges, SlugMatch};
use crate::store::PostStore;
use crate::table::PostTable;

/// Process-lifetime store. Contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    table: Mutex<PostTable>,
}

impl MemoryPostStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock_unpoisoned(&self.table).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PostStore for MemoryPostStore {
    fn find_matching_slugs(&self, base: &str) -> Result<Vec<SlugMatch>, PostStoreError> {
        lock_unpoisoned(&self.table).matching_slugs(base)
    }

    fn insert(&self, post: NewPost) -> Result<Post, PostStoreError> {
        let post = lock_unpoisoned(&self.table).insert(post, OffsetDateTime::now_utc())?;
        tracing::debug!(slug = %post.slug, id = %post.id, "inserted post");
        Ok(post)
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, PostStoreError> {
        Ok(lock_unpoisoned(&self.table).get(slug))
    }

    fn list(&self) -> Result<Vec<Post>, PostStoreError> {
        Ok(lock_unpoisoned(&self.table).list())
    }

    fn update_by_slug(
        &self,
        slug: &str,
        changes: PostChanges,
    ) -> Result<Option<Post>, PostStoreError> {
        lock_unpoisoned(&self.table).update(slug, changes, OffsetDateTime::now_utc())
    }

    fn delete_by_slug(&self, slug: &str) -> Result<Option<Post>, PostStoreError> {
        Ok(lock_unpoisoned(&self.table).delete(slug))
    }

    fn clear(&self) -> Result<usize, PostStoreError> {
        Ok(lock_unpoisoned(&self.table).clear())
    }
}
