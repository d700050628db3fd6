//! Credential persistence
//!
//! The bearer token is written to two places: the durable key-value store and
//! a `token` cookie with the same expiry. Reads follow
//! [`TOKEN_SOURCE_PRIORITY`]: the durable entry is authoritative and the
//! cookie is only consulted when no durable entry exists.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clock::Clock;
use crate::constants::{TOKEN_COOKIE_NAME, TOKEN_STORAGE_KEY};
use crate::error::{Result, TaskDeskError};
use crate::storage::{expires_at, session_cookie, CookieJar, KeyValueStore};

/// Where a credential was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Durable,
    Cookie,
}

pub const TOKEN_SOURCE_PRIORITY: [TokenSource; 2] = [TokenSource::Durable, TokenSource::Cookie];

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    expires_at: DateTime<Utc>,
}

pub struct TokenStore {
    durable: Arc<dyn KeyValueStore>,
    cookies: CookieJar,
    clock: Arc<dyn Clock>,
    secure_cookie: bool,
}

impl TokenStore {
    pub fn new(durable: Arc<dyn KeyValueStore>, cookies: CookieJar, clock: Arc<dyn Clock>) -> Self {
        Self {
            durable,
            cookies,
            clock,
            secure_cookie: true,
        }
    }

    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }

    /// Persist `token` for `ttl_days` days in both locations
    pub fn set_token(&self, token: &str, ttl_days: i64) -> Result<()> {
        if token.is_empty() {
            return Err(TaskDeskError::Validation("Token must not be empty".to_string()));
        }
        if ttl_days < 1 {
            return Err(TaskDeskError::Validation(
                "Token lifetime must be at least one day".to_string(),
            ));
        }

        let now = self.clock.now();
        let cookie = session_cookie(TOKEN_COOKIE_NAME, token, now, ttl_days, self.secure_cookie)?;
        let stored = StoredToken {
            token: token.to_string(),
            expires_at: expires_at(&cookie).unwrap_or(now + Duration::days(ttl_days)),
        };

        self.durable
            .set(TOKEN_STORAGE_KEY, &serde_json::to_string(&stored)?)?;
        self.cookies.set(&cookie)?;
        log::debug!(
            "Stored credential in {} storage and cookie, expires {}",
            self.durable.backend_name(),
            stored.expires_at
        );
        Ok(())
    }

    /// Current token if present and not expired
    pub fn get_token(&self) -> Option<String> {
        self.lookup().map(|(token, _)| token)
    }

    /// Current token together with the location it was read from
    pub fn lookup(&self) -> Option<(String, TokenSource)> {
        let now = self.clock.now();
        TOKEN_SOURCE_PRIORITY.iter().find_map(|source| {
            let read = match source {
                TokenSource::Durable => self.read_durable(now),
                TokenSource::Cookie => self
                    .cookies
                    .get(TOKEN_COOKIE_NAME, now)
                    .map(|cookie| cookie.map(|c| c.value().to_string())),
            };
            match read {
                Ok(Some(token)) => Some((token, *source)),
                Ok(None) => None,
                Err(e) => {
                    log::error!("Failed to read credential from {:?} storage: {}", source, e);
                    None
                }
            }
        })
    }

    fn read_durable(&self, now: DateTime<Utc>) -> Result<Option<String>> {
        let Some(raw) = self.durable.get(TOKEN_STORAGE_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<StoredToken>(&raw) {
            Ok(stored) if now < stored.expires_at => Ok(Some(stored.token)),
            Ok(_) => {
                log::debug!("Stored credential expired, removing");
                self.durable.remove(TOKEN_STORAGE_KEY)?;
                Ok(None)
            }
            Err(e) => {
                log::warn!("Discarding unreadable credential record: {}", e);
                self.durable.remove(TOKEN_STORAGE_KEY)?;
                Ok(None)
            }
        }
    }

    /// Remove the token from both locations. Never fails; storage errors are
    /// logged and the remaining location is still cleared.
    pub fn clear_token(&self) {
        if let Err(e) = self.durable.remove(TOKEN_STORAGE_KEY) {
            log::error!("Failed to remove stored credential: {}", e);
        }
        if let Err(e) = self.cookies.remove(TOKEN_COOKIE_NAME) {
            log::error!("Failed to remove credential cookie: {}", e);
        }
    }
}
