use time::OffsetDateTime;

use crate::error::PostStoreError;
use crate::schema::{NewPost, Post, PostChanges, PostId, SlugMatch};
use crate::slug::{is_valid_slug, slug_pattern};

/// Insertion-ordered post table shared by every backend.
#[derive(Debug, Clone, Default)]
pub(crate) struct PostTable {
    posts: Vec<Post>,
}

impl PostTable {
    pub(crate) fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub(crate) fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub(crate) fn len(&self) -> usize {
        self.posts.len()
    }

    fn position_by_slug(&self, slug: &str) -> Option<usize> {
        self.posts.iter().position(|post| post.slug == slug)
    }

    pub(crate) fn matching_slugs(&self, base: &str) -> Result<Vec<SlugMatch>, PostStoreError> {
        let pattern = slug_pattern(base)?;
        Ok(self
            .posts
            .iter()
            .filter(|post| pattern.is_match(&post.slug))
            .map(|post| SlugMatch {
                id: post.id.clone(),
                slug: post.slug.clone(),
            })
            .collect())
    }

    pub(crate) fn insert(
        &mut self,
        new_post: NewPost,
        now: OffsetDateTime,
    ) -> Result<Post, PostStoreError> {
        ensure_valid_slug(&new_post.slug)?;
        if self.position_by_slug(&new_post.slug).is_some() {
            return Err(PostStoreError::slug_taken(new_post.slug));
        }

        let post = Post {
            id: PostId::generate(),
            title: new_post.title,
            content: new_post.content,
            slug: new_post.slug,
            author: new_post.author,
            status: new_post.status,
            tags: new_post.tags,
            featured: new_post.featured,
            created_at: now,
            updated_at: now,
        };
        self.posts.push(post.clone());
        Ok(post)
    }

    pub(crate) fn get(&self, slug: &str) -> Option<Post> {
        self.position_by_slug(slug)
            .map(|index| self.posts[index].clone())
    }

    pub(crate) fn list(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self.posts.iter().rev().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    pub(crate) fn update(
        &mut self,
        slug: &str,
        changes: PostChanges,
        now: OffsetDateTime,
    ) -> Result<Option<Post>, PostStoreError> {
        let Some(index) = self.position_by_slug(slug) else {
            return Ok(None);
        };

        if let Some(new_slug) = changes.slug.as_deref() {
            if new_slug != slug {
                ensure_valid_slug(new_slug)?;
                if self.position_by_slug(new_slug).is_some() {
                    return Err(PostStoreError::slug_taken(new_slug));
                }
            }
        }

        let post = &mut self.posts[index];
        post.title = changes.title;
        post.content = changes.content;
        if let Some(new_slug) = changes.slug {
            post.slug = new_slug;
        }
        post.updated_at = now;
        Ok(Some(post.clone()))
    }

    pub(crate) fn delete(&mut self, slug: &str) -> Option<Post> {
        self.position_by_slug(slug)
            .map(|index| self.posts.remove(index))
    }

    pub(crate) fn clear(&mut self) -> usize {
        let removed = self.posts.len();
        self.posts.clear();
        removed
    }
}

fn ensure_valid_slug(slug: &str) -> Result<(), PostStoreError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(PostStoreError::InvalidSlug {
            slug: slug.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;

    fn at(seconds: i64) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::seconds(seconds)
    }

    #[test]
    fn list_orders_newest_first_and_breaks_ties_by_insertion() {
        let mut table = PostTable::default();
        table
            .insert(NewPost::new("Old", "<p>a</p>", "old"), at(10))
            .expect("insert old");
        table
            .insert(NewPost::new("Tie A", "<p>b</p>", "tie-a"), at(20))
            .expect("insert tie a");
        table
            .insert(NewPost::new("Tie B", "<p>c</p>", "tie-b"), at(20))
            .expect("insert tie b");

        let slugs: Vec<String> = table.list().into_iter().map(|post| post.slug).collect();
        assert_eq!(slugs, vec!["tie-b", "tie-a", "old"]);
    }

    #[test]
    fn update_to_own_slug_is_not_a_collision() {
        let mut table = PostTable::default();
        table
            .insert(NewPost::new("Foo", "<p>a</p>", "foo"), at(1))
            .expect("insert");

        let updated = table
            .update(
                "foo",
                PostChanges {
                    title: "Foo again".to_string(),
                    content: "<p>b</p>".to_string(),
                    slug: Some("foo".to_string()),
                },
                at(2),
            )
            .expect("update should succeed")
            .expect("post should exist");

        assert_eq!(updated.slug, "foo");
        assert_eq!(updated.created_at, at(1));
        assert_eq!(updated.updated_at, at(2));
    }
}
