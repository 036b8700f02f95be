//! Single-admin login backed by [`SessionStore`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use session_store::{Session, SessionStore, User, ADMIN_ROLE};
use subtle::ConstantTimeEq;

use crate::cookie::{clear_session_cookie, session_cookie, session_token};
use crate::error::BlogError;

pub const ADMIN_USER_ID: &str = "1";
pub const ADMIN_NAME: &str = "Admin";

/// Configured admin login. Stored and compared as plaintext.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AdminCredentials {
    email: String,
    password: String,
}

impl AdminCredentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Both values present. Unconfigured credentials never authenticate.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Returns the admin identity for the exact configured pair, `None` otherwise.
#[must_use]
pub fn validate_credentials(admin: &AdminCredentials, email: &str, password: &str) -> Option<User> {
    if !admin.is_configured() || email.is_empty() || password.is_empty() {
        return None;
    }

    let email_matches = email.as_bytes().ct_eq(admin.email.as_bytes());
    let password_matches = password.as_bytes().ct_eq(admin.password.as_bytes());
    if !bool::from(email_matches & password_matches) {
        return None;
    }

    Some(User {
        id: ADMIN_USER_ID.to_string(),
        email: admin.email.clone(),
        name: ADMIN_NAME.to_string(),
        role: ADMIN_ROLE.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: User,
    pub session_id: String,
    /// Value for the response's `Set-Cookie` header.
    pub set_cookie: String,
}

/// Body of a session probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub user: Option<User>,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    credentials: AdminCredentials,
    sessions: Arc<SessionStore>,
    secure_cookies: bool,
}

impl AuthService {
    pub fn new(credentials: AdminCredentials, sessions: Arc<SessionStore>) -> Self {
        Self {
            credentials,
            sessions,
            secure_cookies: false,
        }
    }

    /// Adds the `Secure` attribute to issued cookies.
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, BlogError> {
        if email.is_empty() || password.is_empty() {
            return Err(BlogError::validation("Email and password are required"));
        }

        let Some(user) = validate_credentials(&self.credentials, email, password) else {
            tracing::warn!(configured = self.credentials.is_configured(), "login rejected");
            return Err(BlogError::auth("Invalid credentials"));
        };

        let session_id = self.sessions.create_session(user.clone());
        let set_cookie = session_cookie(&session_id, self.sessions.ttl(), self.secure_cookies);
        tracing::info!(user = %user.email, "login succeeded");

        Ok(LoginOutcome {
            user,
            session_id,
            set_cookie,
        })
    }

    /// Revokes the session named by the request's cookie, if any, and returns
    /// the `Set-Cookie` value that clears it in the browser.
    pub fn logout(&self, cookie_header: Option<&str>) -> String {
        if let Some(token) = cookie_header.and_then(session_token) {
            self.sessions.delete_session(&token);
        }
        clear_session_cookie(self.secure_cookies)
    }

    pub fn current_session(&self, cookie_header: Option<&str>) -> Option<Session> {
        let token = cookie_header.and_then(session_token)?;
        self.sessions.get_session(&token)
    }

    pub fn session_status(&self, cookie_header: Option<&str>) -> SessionStatus {
        let user = self.current_session(cookie_header).map(|session| session.user);
        SessionStatus {
            authenticated: user.is_some(),
            user,
        }
    }

    /// Gate for admin mutations.
    pub fn require_admin(&self, cookie_header: Option<&str>) -> Result<User, BlogError> {
        let session = self
            .current_session(cookie_header)
            .ok_or_else(|| BlogError::auth("Authentication required"))?;
        if !session.user.is_admin() {
            return Err(BlogError::auth("Admin access required"));
        }
        Ok(session.user)
    }
}
