use post_store::PostStoreError;
use thiserror::Error;

/// Failures surfaced to the request boundary. None of them are fatal to the
/// process.
#[derive(Debug, Error)]
pub enum BlogError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Auth(String),

    #[error("storage error: {0}")]
    Storage(#[from] PostStoreError),
}

impl BlogError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// HTTP status the transport layer should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Auth(_) => 401,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Storage(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(BlogError::validation("x").status_code(), 400);
        assert_eq!(BlogError::auth("x").status_code(), 401);
        assert_eq!(BlogError::not_found("x").status_code(), 404);
        assert_eq!(BlogError::conflict("x").status_code(), 409);
        assert_eq!(
            BlogError::from(PostStoreError::slug_taken("foo")).status_code(),
            500
        );
    }

    #[test]
    fn display_is_the_caller_facing_message() {
        assert_eq!(
            BlogError::validation("Title is required").to_string(),
            "Title is required"
        );
        assert_eq!(
            BlogError::from(PostStoreError::slug_taken("foo")).to_string(),
            "storage error: slug 'foo' is already taken"
        );
    }
}
