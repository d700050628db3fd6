//! Auth event logging
//!
//! Session transitions and access decisions are logged with an `AUTH:` prefix
//! so they can be filtered out of the regular request trace. Tokens and
//! passwords never appear in these events.

use crate::auth::user::Role;

#[derive(Debug, Clone)]
pub enum AuthEvent {
    LoginSucceeded { user_id: String, role: Role },
    LoginFailed { email: String, reason: String },
    Registered { user_id: String, role: Role },
    Rehydrated { user_id: String, role: Role },
    LoggedOut { user_id: Option<String> },
    SessionInvalidated { user_id: Option<String>, path: String },
    AccessDenied { user_id: Option<String>, route: String, reason: &'static str },
}

/// Log an auth event at the level matching its severity
pub fn record(event: &AuthEvent) {
    match event {
        AuthEvent::LoginSucceeded { user_id, role } => {
            log::info!("AUTH: Login succeeded - User: {}, Role: {}", user_id, role);
        }
        AuthEvent::LoginFailed { email, reason } => {
            log::warn!("AUTH: Login failed - Email: {}, Reason: {}", email, reason);
        }
        AuthEvent::Registered { user_id, role } => {
            log::info!("AUTH: Account registered - User: {}, Role: {}", user_id, role);
        }
        AuthEvent::Rehydrated { user_id, role } => {
            log::info!("AUTH: Session restored - User: {}, Role: {}", user_id, role);
        }
        AuthEvent::LoggedOut { user_id } => {
            log::info!("AUTH: Logged out - User: {:?}", user_id);
        }
        AuthEvent::SessionInvalidated { user_id, path } => {
            log::warn!(
                "AUTH: Credential rejected, session cleared - User: {:?}, Path: {}",
                user_id,
                path
            );
        }
        AuthEvent::AccessDenied { user_id, route, reason } => {
            log::warn!(
                "AUTH: Access denied - User: {:?}, Route: {}, Reason: {}",
                user_id,
                route,
                reason
            );
        }
    }
}
