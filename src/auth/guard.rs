//! Role-based route guard
//!
//! Pure decision functions; the caller decides where to send the user.

use crate::auth::user::{Role, Session};

/// Outcome of a guard check. `Unauthenticated` and `Forbidden` lead to
/// different places (login vs. forbidden view) and must not be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Unauthenticated,
    Forbidden,
}

/// True iff there is a session and its role is one of `required_roles`
pub fn is_allowed(session: Option<&Session>, required_roles: &[Role]) -> bool {
    match session {
        Some(session) => required_roles.contains(&session.role),
        None => false,
    }
}

pub fn check(session: Option<&Session>, required_roles: &[Role]) -> Access {
    match session {
        None => Access::Unauthenticated,
        Some(_) if is_allowed(session, required_roles) => Access::Granted,
        Some(_) => Access::Forbidden,
    }
}
