//! Storage collaborator for blog posts.
//!
//! Backends keep slugs unique at write time: an insert or update that would
//! reuse another post's slug fails with [`PostStoreError::SlugTaken`], so a
//! racing caller can retry with a fresh slug instead of silently duplicating
//! one.

mod error;
mod file;
mod memory;
mod schema;
mod slug;
mod store;
mod table;

pub use error::PostStoreError;
pub use file::FilePostStore;
pub use memory::MemoryPostStore;
pub use schema::{NewPost, Post, PostChanges, PostId, SlugMatch, DEFAULT_STATUS};
pub use slug::{is_valid_slug, slug_pattern, MAX_SLUG_LEN};
pub use store::PostStore;

use std::sync::{Mutex, MutexGuard};

pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
