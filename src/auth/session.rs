//! Auth session state machine
//!
//! `Unauthenticated -> Authenticating -> Authenticated` on login or register,
//! back to `Unauthenticated` on failure, logout or forced invalidation.
//! Every state change is a short synchronous critical section; no lock is
//! held across an await point.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use validator::Validate;

use crate::audit::{self, AuthEvent};
use crate::auth::token::TokenStore;
use crate::auth::user::{PersistedUser, Session};
use crate::constants::USER_RECORD_KEY;
use crate::error::{Result, TaskDeskError};
use crate::services::auth::{AuthResponse, Credentials, Registration};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated(Session),
}

/// Backend endpoints that exchange credentials for a token
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse>;

    async fn register(&self, registration: &Registration) -> Result<AuthResponse>;
}

pub struct AuthSessionManager {
    state: RwLock<AuthState>,
    tokens: Arc<TokenStore>,
    records: Arc<dyn KeyValueStore>,
    token_ttl_days: i64,
}

impl AuthSessionManager {
    pub fn new(tokens: Arc<TokenStore>, records: Arc<dyn KeyValueStore>, token_ttl_days: i64) -> Self {
        Self {
            state: RwLock::new(AuthState::Unauthenticated),
            tokens,
            records,
            token_ttl_days,
        }
    }

    // A poisoned lock still holds a valid AuthState; recover it so logout
    // and invalidation stay infallible.
    fn write_state(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> AuthState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current_user(&self) -> Option<Session> {
        match self.state() {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), AuthState::Authenticated(_))
    }

    /// Exchange credentials for a session
    pub async fn login<A>(&self, api: &A, credentials: &Credentials) -> Result<Session>
    where
        A: AuthApi + ?Sized,
    {
        credentials.validate()?;
        self.begin();
        let outcome = api.login(credentials).await;
        self.finish(outcome, &credentials.email, false)
    }

    /// Create an account and start a session for it
    pub async fn register<A>(&self, api: &A, registration: &Registration) -> Result<Session>
    where
        A: AuthApi + ?Sized,
    {
        registration.validate()?;
        self.begin();
        let outcome = api.register(registration).await;
        self.finish(outcome, &registration.email, true)
    }

    // Entering Authenticating drops whatever session was active before.
    fn begin(&self) {
        let mut state = self.write_state();
        if let AuthState::Authenticated(previous) = &*state {
            log::info!("Replacing session of user {}", previous.user_id);
            self.tokens.clear_token();
            self.remove_record();
        }
        *state = AuthState::Authenticating;
    }

    fn finish(&self, outcome: Result<AuthResponse>, email: &str, registered: bool) -> Result<Session> {
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                *self.write_state() = AuthState::Unauthenticated;
                audit::record(&AuthEvent::LoginFailed {
                    email: email.to_string(),
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        match self.establish(&response) {
            Ok(session) => {
                let event = if registered {
                    AuthEvent::Registered {
                        user_id: session.user_id.clone(),
                        role: session.role,
                    }
                } else {
                    AuthEvent::LoginSucceeded {
                        user_id: session.user_id.clone(),
                        role: session.role,
                    }
                };
                audit::record(&event);
                Ok(session)
            }
            Err(e) => {
                self.tokens.clear_token();
                self.remove_record();
                *self.write_state() = AuthState::Unauthenticated;
                log::error!("Failed to persist new session: {}", e);
                Err(e)
            }
        }
    }

    fn establish(&self, response: &AuthResponse) -> Result<Session> {
        if response.token.is_empty() {
            return Err(TaskDeskError::SerializationError(
                "Authentication response did not include a token".to_string(),
            ));
        }

        let session = Session::from(&response.user);
        let record = PersistedUser::new(&response.token, &session);

        let mut state = self.write_state();
        self.tokens.set_token(&response.token, self.token_ttl_days)?;
        self.records
            .set(USER_RECORD_KEY, &serde_json::to_string(&record)?)?;
        *state = AuthState::Authenticated(session.clone());
        Ok(session)
    }

    /// Restore a session from the persisted user record without contacting the
    /// backend. A record without a live matching token is discarded.
    pub fn rehydrate(&self) -> Option<Session> {
        let record = match self.records.get(USER_RECORD_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<PersistedUser>(&raw) {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Discarding unreadable user record: {}", e);
                    self.remove_record();
                    return None;
                }
            },
            Ok(None) => return None,
            Err(e) => {
                log::error!("Failed to read user record: {}", e);
                return None;
            }
        };

        match self.tokens.get_token() {
            Some(token) if token == record.token => {
                let session = record.session();
                *self.write_state() = AuthState::Authenticated(session.clone());
                audit::record(&AuthEvent::Rehydrated {
                    user_id: session.user_id.clone(),
                    role: session.role,
                });
                Some(session)
            }
            Some(_) => {
                log::warn!("Stored credential does not match user record, discarding both");
                self.tokens.clear_token();
                self.remove_record();
                None
            }
            None => {
                log::debug!("User record present but credential missing or expired");
                self.remove_record();
                None
            }
        }
    }

    /// Any state to Unauthenticated. Cannot fail.
    pub fn logout(&self) {
        let previous = self.teardown();
        audit::record(&AuthEvent::LoggedOut {
            user_id: previous.map(|s| s.user_id),
        });
    }

    /// Forced logout after the backend rejected the credential. Returns the
    /// session that was dropped, if any.
    pub fn invalidate(&self, path: &str) -> Option<Session> {
        let previous = self.teardown();
        audit::record(&AuthEvent::SessionInvalidated {
            user_id: previous.as_ref().map(|s| s.user_id.clone()),
            path: path.to_string(),
        });
        previous
    }

    fn teardown(&self) -> Option<Session> {
        let mut state = self.write_state();
        self.tokens.clear_token();
        self.remove_record();
        match std::mem::replace(&mut *state, AuthState::Unauthenticated) {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    fn remove_record(&self) {
        if let Err(e) = self.records.remove(USER_RECORD_KEY) {
            log::error!("Failed to remove user record: {}", e);
        }
    }
}
