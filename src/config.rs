//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use post_store::{FilePostStore, MemoryPostStore, PostStore, PostStoreError};
use session_store::{SessionStore, MAX_SESSION_TTL, SESSION_TTL};
use thiserror::Error;
use time::Duration;

use crate::auth::AdminCredentials;

pub const ADMIN_EMAIL_VAR: &str = "ADMIN_EMAIL";
pub const ADMIN_PASSWORD_VAR: &str = "ADMIN_PASSWORD";
pub const DATA_PATH_VAR: &str = "BLOG_DATA_PATH";
pub const SECURE_COOKIES_VAR: &str = "BLOG_SECURE_COOKIES";
pub const SESSION_TTL_VAR: &str = "BLOG_SESSION_TTL_SECS";
pub const LOG_FILTER_VAR: &str = "BLOG_LOG";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "{var} must be a number of seconds between 1 and {max}, got '{value}'",
        max = MAX_SESSION_TTL.whole_seconds()
    )]
    InvalidSessionTtl { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct BlogConfig {
    pub admin: AdminCredentials,
    /// JSON-lines post file. `None` keeps posts in memory.
    pub data_path: Option<PathBuf>,
    pub secure_cookies: bool,
    pub session_ttl: Duration,
    pub log_filter: Option<String>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            admin: AdminCredentials::default(),
            data_path: None,
            secure_cookies: false,
            session_ttl: SESSION_TTL,
            log_filter: None,
        }
    }
}

impl BlogConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            admin: AdminCredentials::new(
                env_string_opt(ADMIN_EMAIL_VAR).unwrap_or_default(),
                env_string_opt(ADMIN_PASSWORD_VAR).unwrap_or_default(),
            ),
            data_path: env_string_opt(DATA_PATH_VAR).map(PathBuf::from),
            secure_cookies: env_flag(SECURE_COOKIES_VAR),
            session_ttl: env_session_ttl()?,
            log_filter: env_string_opt(LOG_FILTER_VAR),
        })
    }

    /// File-backed when `data_path` is set, in-memory otherwise.
    pub fn open_store(&self) -> Result<Arc<dyn PostStore>, PostStoreError> {
        match &self.data_path {
            Some(path) => Ok(Arc::new(FilePostStore::open_or_create(path)?)),
            None => Ok(Arc::new(MemoryPostStore::new())),
        }
    }

    #[must_use]
    pub fn session_store(&self) -> SessionStore {
        SessionStore::new().with_ttl(self.session_ttl)
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_session_ttl() -> Result<Duration, ConfigError> {
    let Some(value) = env_string_opt(SESSION_TTL_VAR) else {
        return Ok(SESSION_TTL);
    };

    match value.trim().parse::<i64>() {
        Ok(seconds) if (1..=MAX_SESSION_TTL.whole_seconds()).contains(&seconds) => {
            Ok(Duration::seconds(seconds))
        }
        _ => Err(ConfigError::InvalidSessionTtl {
            var: SESSION_TTL_VAR,
            value,
        }),
    }
}
