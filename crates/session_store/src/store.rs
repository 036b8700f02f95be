use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::schema::{Session, User};
use crate::token::generate_token;

/// Lifetime of a freshly issued session.
pub const SESSION_TTL: Duration = Duration::hours(24);

/// Longest lifetime a store will hand out. Larger requests are clamped.
pub const MAX_SESSION_TTL: Duration = Duration::days(365);

/// Token → session table with absolute expiry.
///
/// Lifecycle per token: active until `expires_at`, then expired until the next
/// lookup evicts it, then absent for good. A token never becomes valid again;
/// logging in always issues a new one.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            clock,
            ttl: SESSION_TTL,
        }
    }

    /// Overrides the session lifetime, clamped to [`MAX_SESSION_TTL`].
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl.min(MAX_SESSION_TTL);
        self
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a new token for `user` and records the session.
    pub fn create_session(&self, user: User) -> String {
        let now = self.clock.now();
        // An unrepresentable deadline yields a session that is already expired.
        let expires_at = now.checked_add(self.ttl).unwrap_or(now);
        let mut sessions = self.lock();

        let mut session_id = generate_token();
        while sessions.contains_key(&session_id) {
            session_id = generate_token();
        }

        tracing::info!(user = %user.email, role = %user.role, "session created");
        sessions.insert(
            session_id.clone(),
            Session {
                id: session_id.clone(),
                user,
                created_at: now,
                expires_at,
            },
        );

        session_id
    }

    /// Fails closed: empty, unknown, and expired tokens all yield `None`.
    /// An expired entry is removed as part of the lookup.
    pub fn get_session(&self, session_id: &str) -> Option<Session> {
        if session_id.is_empty() {
            return None;
        }

        let now = self.clock.now();
        let mut sessions = self.lock();
        let session = sessions.get(session_id)?;

        if session.is_expired_at(now) {
            tracing::debug!(user = %session.user.email, "evicting expired session");
            sessions.remove(session_id);
            return None;
        }

        Some(session.clone())
    }

    /// Idempotent.
    pub fn delete_session(&self, session_id: &str) {
        if let Some(session) = self.lock().remove(session_id) {
            tracing::info!(user = %session.user.email, "session deleted");
        }
    }

    /// Drops every expired entry without waiting for a lookup.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "purged expired sessions");
        }
        purged
    }

    /// Raw table membership, ignoring expiry.
    #[must_use]
    pub fn contains_raw(&self, session_id: &str) -> bool {
        self.lock().contains_key(session_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
