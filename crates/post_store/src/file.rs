use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use time::OffsetDateTime;

use crate::error::PostStoreError;
use crate::lock_unpoisoned;
use crate::schema::{NewPost, Post, PostChanges, SlugMatch};
use crate::slug::is_valid_slug;
use crate::store::PostStore;
use crate::table::PostTable;

/// JSON-lines backed store: one [`Post`] object per line.
///
/// The whole file is rewritten on every mutation through a sibling temp file
/// and a rename, so readers never observe a half-written table. A failed write
/// leaves the in-memory table untouched.
#[derive(Debug)]
pub struct FilePostStore {
    path: PathBuf,
    table: Mutex<PostTable>,
}

impl FilePostStore {
    /// Creates (or truncates) `path` as an empty store.
    pub fn create(path: &Path) -> Result<Self, PostStoreError> {
        let path = path.to_path_buf();
        File::create(&path)
            .map_err(|source| PostStoreError::io("creating post file", &path, source))?;

        Ok(Self {
            path,
            table: Mutex::new(PostTable::default()),
        })
    }

    /// Opens an existing file, validating every line before accepting it.
    pub fn open(path: &Path) -> Result<Self, PostStoreError> {
        let path = path.to_path_buf();
        let read_file = File::open(&path)
            .map_err(|source| PostStoreError::io("opening post file", &path, source))?;
        let reader = BufReader::new(read_file);

        let mut posts = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut seen_slugs = HashSet::new();

        for (line_index, line_result) in reader.lines().enumerate() {
            let line_number = line_index + 1;
            let line =
                line_result.map_err(|source| PostStoreError::io_line(&path, line_number, source))?;
            if line.trim().is_empty() {
                continue;
            }

            let post = parse_post_line(&path, line_number, &line)?;
            validate_post_line(&path, line_number, &post)?;

            if !seen_ids.insert(post.id.clone()) {
                return Err(PostStoreError::DuplicatePostId {
                    path,
                    line: line_number,
                    id: post.id.to_string(),
                });
            }
            if !seen_slugs.insert(post.slug.clone()) {
                return Err(PostStoreError::DuplicateSlug {
                    path,
                    line: line_number,
                    slug: post.slug,
                });
            }

            posts.push(post);
        }

        tracing::debug!(path = %path.display(), posts = posts.len(), "opened post file");

        Ok(Self {
            path,
            table: Mutex::new(PostTable::from_posts(posts)),
        })
    }

    /// Opens `path` when it exists, otherwise creates it.
    pub fn open_or_create(path: &Path) -> Result<Self, PostStoreError> {
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate<R>(
        &self,
        apply: impl FnOnce(&mut PostTable) -> Result<R, PostStoreError>,
    ) -> Result<R, PostStoreError> {
        let mut table = lock_unpoisoned(&self.table);
        let mut staged = table.clone();
        let result = apply(&mut staged)?;
        write_posts(&self.path, staged.posts())?;
        *table = staged;
        Ok(result)
    }
}

impl PostStore for FilePostStore {
    fn find_matching_slugs(&self, base: &str) -> Result<Vec<SlugMatch>, PostStoreError> {
        lock_unpoisoned(&self.table).matching_slugs(base)
    }

    fn insert(&self, post: NewPost) -> Result<Post, PostStoreError> {
        let post = self.mutate(|table| table.insert(post, OffsetDateTime::now_utc()))?;
        tracing::debug!(slug = %post.slug, id = %post.id, path = %self.path.display(), "inserted post");
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
        self.mutate(|table| table.update(slug, changes, OffsetDateTime::now_utc()))
    }

    fn delete_by_slug(&self, slug: &str) -> Result<Option<Post>, PostStoreError> {
        self.mutate(|table| Ok(table.delete(slug)))
    }

    fn clear(&self) -> Result<usize, PostStoreError> {
        self.mutate(|table| Ok(table.clear()))
    }
}

pub(crate) fn parse_post_line(
    path: &Path,
    line_number: usize,
    line: &str,
) -> Result<Post, PostStoreError> {
    serde_json::from_str::<Post>(line)
        .map_err(|source| PostStoreError::json_line(path, line_number, source))
}

pub(crate) fn validate_post_line(
    path: &Path,
    line_number: usize,
    post: &Post,
) -> Result<(), PostStoreError> {
    if !is_valid_slug(&post.slug) {
        return Err(PostStoreError::InvalidStoredSlug {
            path: path.to_path_buf(),
            line: line_number,
            slug: post.slug.clone(),
        });
    }

    Ok(())
}

fn write_posts(path: &Path, posts: &[Post]) -> Result<(), PostStoreError> {
    let temp_path = temp_path_for(path);
    let file = File::create(&temp_path)
        .map_err(|source| PostStoreError::io("creating temp post file", &temp_path, source))?;
    let mut writer = BufWriter::new(file);

    for post in posts {
        let line = serde_json::to_string(post).map_err(|source| PostStoreError::JsonSerialize {
            path: path.to_path_buf(),
            id: post.id.to_string(),
            source,
        })?;
        writeln!(writer, "{line}")
            .map_err(|source| PostStoreError::io("writing temp post file", &temp_path, source))?;
    }

    let file = writer
        .into_inner()
        .map_err(|error| PostStoreError::io("flushing temp post file", &temp_path, error.into_error()))?;
    file.sync_all()
        .map_err(|source| PostStoreError::io("syncing temp post file", &temp_path, source))?;

    fs::rename(&temp_path, path)
        .map_err(|source| PostStoreError::io("replacing post file", path, source))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
