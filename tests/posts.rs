use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use blog::seed::{sample_posts, seed};
use blog::{BlogError, CreatePost, PostService, SlugAssigner, UpdatePost, MAX_SLUG_ATTEMPTS};
use post_store::{
    FilePostStore, MemoryPostStore, NewPost, Post, PostChanges, PostStore, PostStoreError,
    SlugMatch,
};
use pretty_assertions::assert_eq;

fn service() -> PostService {
    PostService::new(Arc::new(MemoryPostStore::new()))
}

fn create(posts: &PostService, title: &str) -> Post {
    posts
        .create(CreatePost::new(title, "<p>body</p>"))
        .expect("create should succeed")
}

/// Hides every existing slug from the first `stale_lookups` queries, the way a
/// concurrent writer's insert is invisible to a lookup that ran just before it.
struct StaleLookupStore {
    inner: MemoryPostStore,
    stale_lookups: AtomicUsize,
}

impl StaleLookupStore {
    fn new(stale_lookups: usize) -> Self {
        Self {
            inner: MemoryPostStore::new(),
            stale_lookups: AtomicUsize::new(stale_lookups),
        }
    }
}

impl PostStore for StaleLookupStore {
    fn find_matching_slugs(&self, base: &str) -> Result<Vec<SlugMatch>, PostStoreError> {
        let stale = self
            .stale_lookups
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(Vec::new());
        }
        self.inner.find_matching_slugs(base)
    }

    fn insert(&self, post: NewPost) -> Result<Post, PostStoreError> {
        self.inner.insert(post)
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, PostStoreError> {
        self.inner.get_by_slug(slug)
    }

    fn list(&self) -> Result<Vec<Post>, PostStoreError> {
        self.inner.list()
    }

    fn update_by_slug(
        &self,
        slug: &str,
        changes: PostChanges,
    ) -> Result<Option<Post>, PostStoreError> {
        self.inner.update_by_slug(slug, changes)
    }

    fn delete_by_slug(&self, slug: &str) -> Result<Option<Post>, PostStoreError> {
        self.inner.delete_by_slug(slug)
    }

    fn clear(&self) -> Result<usize, PostStoreError> {
        self.inner.clear()
    }
}

#[test]
fn create_derives_slug_from_title() {
    let posts = service();
    let post = create(&posts, "Getting Started with Next.js and MongoDB");

    assert_eq!(post.slug, "getting-started-with-nextjs-and-mongodb");
    assert_eq!(post.status, "published");
    assert_eq!(posts.get(&post.slug).expect("get"), post);
}

#[test]
fn colliding_titles_get_count_based_suffixes() {
    let posts = service();
    assert_eq!(create(&posts, "Foo").slug, "foo");
    assert_eq!(create(&posts, "foo!").slug, "foo-2");
    assert_eq!(create(&posts, "FOO").slug, "foo-3");
}

#[test]
fn suffix_skips_slugs_freed_out_of_order() {
    let posts = service();
    create(&posts, "Foo");
    create(&posts, "Foo");
    create(&posts, "Foo");
    posts.delete("foo-2").expect("delete");

    // Two family members remain, so the count policy proposes foo-3, which is taken.
    assert_eq!(create(&posts, "Foo").slug, "foo-4");
}

#[test]
fn assigner_does_not_collide_with_excluded_post() {
    let store = MemoryPostStore::new();
    let existing = store
        .insert(NewPost::new("Foo", "<p>a</p>", "foo"))
        .expect("insert");

    let assigner = SlugAssigner::new(&store);
    assert_eq!(
        assigner.assign("Foo", Some(&existing.id)).expect("assign"),
        "foo"
    );
    assert_eq!(assigner.assign("Foo", None).expect("assign"), "foo-2");
}

#[test]
fn unusable_titles_are_validation_errors() {
    let posts = service();

    let error = posts
        .create(CreatePost::new("!!! ???", "<p>body</p>"))
        .expect_err("punctuation-only title must fail");
    assert_matches!(error, BlogError::Validation(ref message) if message.contains("slug"));

    let error = posts
        .create(CreatePost::new("   ", "<p>body</p>"))
        .expect_err("blank title must fail");
    assert_matches!(error, BlogError::Validation(ref message) if message == "Title is required");

    let error = posts
        .create(CreatePost::new("Title", "<p><br></p>"))
        .expect_err("placeholder content must fail");
    assert_matches!(error, BlogError::Validation(ref message) if message == "Content is required");
    assert!(posts.list().expect("list").is_empty());
}

#[test]
fn create_retries_when_slug_is_claimed_between_lookup_and_write() {
    let store = Arc::new(StaleLookupStore::new(0));
    let posts = PostService::new(store.clone());
    create(&posts, "Foo");
    store.stale_lookups.store(1, Ordering::SeqCst);

    // The first lookup misses "foo", the insert is rejected, the retry sees it.
    let second = create(&posts, "Foo");
    assert_eq!(second.slug, "foo-2");
    assert_eq!(store.list().expect("list").len(), 2);
}

#[test]
fn create_gives_up_after_bounded_retries() {
    let store = Arc::new(StaleLookupStore::new(0));
    let posts = PostService::new(store.clone());
    create(&posts, "Foo");
    store
        .stale_lookups
        .store(MAX_SLUG_ATTEMPTS, Ordering::SeqCst);

    let error = posts
        .create(CreatePost::new("Foo", "<p>b</p>"))
        .expect_err("every attempt collides");
    assert_matches!(error, BlogError::Conflict(_));
    assert_eq!(error.status_code(), 409);
    assert_eq!(store.list().expect("list").len(), 1);
}

#[test]
fn get_update_delete_report_missing_posts() {
    let posts = service();

    assert_matches!(posts.get("nope"), Err(BlogError::NotFound(_)));
    assert_matches!(posts.delete("nope"), Err(BlogError::NotFound(_)));
    assert_matches!(
        posts.update("nope", UpdatePost::new("T", "<p>c</p>")),
        Err(BlogError::NotFound(_))
    );
}

#[test]
fn update_keeps_slug_when_title_is_unchanged() {
    let posts = service();
    let post = create(&posts, "Foo");

    let updated = posts
        .update("foo", UpdatePost::new("  Foo ", "<p>new body</p>"))
        .expect("update");
    assert_eq!(updated.id, post.id);
    assert_eq!(updated.slug, "foo");
    assert_eq!(updated.content, "<p>new body</p>");
}

#[test]
fn update_rederives_slug_when_title_changes() {
    let posts = service();
    create(&posts, "Foo");
    create(&posts, "Bar");

    let renamed = posts
        .update("foo", UpdatePost::new("Baz", "<p>c</p>"))
        .expect("update");
    assert_eq!(renamed.slug, "baz");

    let collided = posts
        .update("baz", UpdatePost::new("Bar", "<p>c</p>"))
        .expect("update");
    assert_eq!(collided.slug, "bar-2");

    let same_base = posts
        .update("bar-2", UpdatePost::new("Bar!", "<p>c</p>"))
        .expect("update");
    assert_eq!(same_base.slug, "bar-2");
}

#[test]
fn update_with_explicit_slug() {
    let posts = service();
    create(&posts, "Foo");
    create(&posts, "Bar");

    let moved = posts
        .update("foo", UpdatePost::new("Foo", "<p>c</p>").with_slug("hello-world"))
        .expect("update");
    assert_eq!(moved.slug, "hello-world");
    assert_matches!(posts.get("foo"), Err(BlogError::NotFound(_)));

    let error = posts
        .update("hello-world", UpdatePost::new("Foo", "<p>c</p>").with_slug("bar"))
        .expect_err("taken slug must conflict");
    assert_matches!(error, BlogError::Conflict(ref message) if message == "A post with this slug already exists");

    let error = posts
        .update("hello-world", UpdatePost::new("Foo", "<p>c</p>").with_slug("Not Safe"))
        .expect_err("unsafe slug must fail");
    assert_matches!(error, BlogError::Validation(_));

    let unchanged = posts
        .update("hello-world", UpdatePost::new("Foo", "<p>d</p>").with_slug("hello-world"))
        .expect("same slug is not a change");
    assert_eq!(unchanged.slug, "hello-world");
}

#[test]
fn resubmitting_current_slug_keeps_it_through_a_title_change() {
    let posts = service();
    let post = create(&posts, "Foo");

    let updated = posts
        .update("foo", UpdatePost::new("Completely New", "<p>c</p>").with_slug(" foo "))
        .expect("update");
    assert_eq!(updated.id, post.id);
    assert_eq!(updated.slug, "foo");
    assert_eq!(updated.title, "Completely New");

    let blank = posts
        .update("foo", UpdatePost::new("Something Else", "<p>c</p>").with_slug("  "))
        .expect("blank slug falls back to derivation");
    assert_eq!(blank.slug, "something-else");
}

#[test]
fn list_is_newest_first_and_summaries_follow() {
    let posts = service();
    create(&posts, "First");
    create(&posts, "Second");

    let titles: Vec<String> = posts
        .list()
        .expect("list")
        .into_iter()
        .map(|post| post.title)
        .collect();
    assert_eq!(titles, vec!["Second".to_string(), "First".to_string()]);

    let summaries = posts.summaries().expect("summaries");
    assert_eq!(summaries[0].slug, "second");
    assert_eq!(summaries[0].excerpt, "body");
    assert_eq!(summaries[0].reading_time_minutes, 1);
}

#[test]
fn seeding_replaces_posts_with_samples() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("posts.jsonl");
    let posts = PostService::new(Arc::new(
        FilePostStore::create(&path).expect("create store"),
    ));
    create(&posts, "Leftover");

    let seeded = seed(&posts).expect("seed");
    let slugs: Vec<&str> = seeded.iter().map(|post| post.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec![
            "getting-started-with-nextjs-and-mongodb",
            "understanding-react-hooks-a-comprehensive-guide",
            "building-responsive-layouts-with-tailwind-css",
            "api-design-best-practices-with-nodejs",
            "modern-javascript-features-you-should-know",
        ]
    );
    assert_eq!(seeded.len(), sample_posts().len());
    assert!(seeded.iter().all(|post| post.author.as_deref() == Some("Admin")));

    let reopened = FilePostStore::open(&path).expect("reopen");
    assert_eq!(reopened.list().expect("list").len(), 5);
    assert!(reopened.get_by_slug("leftover").expect("get").is_none());

    // Seeding twice keeps the same slugs because the store is cleared first.
    let again = seed(&posts).expect("seed again");
    assert_eq!(again[0].slug, "getting-started-with-nextjs-and-mongodb");
}
