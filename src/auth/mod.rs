//! Authentication, session and authorization module

pub mod guard;
pub mod session;
pub mod token;
pub mod user;

// Re-export main components
pub use guard::{check, is_allowed, Access};
pub use session::{AuthApi, AuthSessionManager, AuthState};
pub use token::{TokenSource, TokenStore, TOKEN_SOURCE_PRIORITY};
pub use user::{PersistedUser, Role, Session};
