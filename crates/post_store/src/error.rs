use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostStoreError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while reading line {line} in {path}: {source}")]
    IoLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON at {path}:{line}: {source}")]
    JsonLineParse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line} in {path} contains a duplicate post id '{id}'")]
    DuplicatePostId {
        path: PathBuf,
        line: usize,
        id: String,
    },

    #[error("line {line} in {path} reuses slug '{slug}'")]
    DuplicateSlug {
        path: PathBuf,
        line: usize,
        slug: String,
    },

    #[error("line {line} in {path} has a slug that is not URL-safe: '{slug}'")]
    InvalidStoredSlug {
        path: PathBuf,
        line: usize,
        slug: String,
    },

    #[error("failed to serialize post '{id}' for {path}: {source}")]
    JsonSerialize {
        path: PathBuf,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("slug '{slug}' is already taken")]
    SlugTaken { slug: String },

    #[error("slug '{slug}' is not URL-safe")]
    InvalidSlug { slug: String },

    #[error("failed to build slug pattern for '{base}': {source}")]
    Pattern {
        base: String,
        #[source]
        source: regex::Error,
    },
}

impl PostStoreError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn io_line(path: impl Into<PathBuf>, line: usize, source: std::io::Error) -> Self {
        Self::IoLine {
            path: path.into(),
            line,
            source,
        }
    }

    #[must_use]
    pub fn json_line(path: impl Into<PathBuf>, line: usize, source: serde_json::Error) -> Self {
        Self::JsonLineParse {
            path: path.into(),
            line,
            source,
        }
    }

    #[must_use]
    pub fn slug_taken(slug: impl Into<String>) -> Self {
        Self::SlugTaken { slug: slug.into() }
    }

    /// True when the write was rejected by the unique-slug backstop.
    #[must_use]
    pub fn is_slug_taken(&self) -> bool {
        matches!(self, Self::SlugTaken { .. })
    }
}
