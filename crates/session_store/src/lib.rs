//! In-process session table for the admin area.
//!
//! Sessions live only as long as the owning [`SessionStore`]; nothing is
//! persisted, so a restart logs every admin out and separate processes do not
//! share sessions. Construct one store at startup and hand it to request
//! handlers behind an `Arc`.

mod clock;
mod schema;
mod store;
mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use schema::{Session, User, ADMIN_ROLE};
pub use store::{SessionStore, MAX_SESSION_TTL, SESSION_TTL};
pub use token::{generate_token, TOKEN_BYTES};
