//! Core of a small content-managed blog.
//!
//! # Public API Overview
//! - Derive unique URL slugs for posts with [`SlugAssigner`] on top of any
//!   [`post_store::PostStore`] backend.
//! - Create, edit, list, and delete posts through [`PostService`], which
//!   validates input and maps storage failures onto [`BlogError`].
//! - Gate admin mutations with [`AuthService`]: a single configured admin
//!   logs in, receives an opaque session token in a `session` cookie, and
//!   every protected call resolves that cookie through
//!   [`session_store::SessionStore`].
//! - Build listing cards with [`PostSummary`].
//!
//! Admin credentials are a placeholder single-admin scheme read from the
//! environment: plaintext values compared in constant time, with no hashing or
//! rate limiting.

pub mod auth;
pub mod config;
pub mod cookie;
pub mod error;
pub mod logging;
pub mod posts;
pub mod seed;
pub mod slug;
pub mod summary;

pub use crate::auth::{validate_credentials, AdminCredentials, AuthService, LoginOutcome, SessionStatus};
pub use crate::config::{BlogConfig, ConfigError};
pub use crate::error::BlogError;
pub use crate::posts::{CreatePost, PostService, UpdatePost, MAX_SLUG_ATTEMPTS};
pub use crate::slug::{is_valid_slug, slugify, SlugAssigner};
pub use crate::summary::PostSummary;

pub use post_store::{Post, PostId};
pub use session_store::{Session, SessionStore, User};
