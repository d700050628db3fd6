//! Cookie jar
//!
//! Cookies are kept in their percent-encoded `Set-Cookie` form on top of a
//! [`KeyValueStore`], so the jar survives restarts the same way a browser's
//! cookie store does. Formatting and parsing are done by the `cookie` crate.

use chrono::{DateTime, Duration, Utc};
use cookie::{Cookie, SameSite};
use std::sync::Arc;
use time::OffsetDateTime;

use super::traits::KeyValueStore;
use crate::error::{Result, TaskDeskError};

const KEY_PREFIX: &str = "cookie:";

/// Build a `path=/`, `samesite=strict` cookie expiring `days` days after
/// `now`, truncated to whole seconds
pub fn session_cookie(
    name: &str,
    value: &str,
    now: DateTime<Utc>,
    days: i64,
    secure: bool,
) -> Result<Cookie<'static>> {
    let expires = to_offset(now + Duration::days(days))?;
    Ok(Cookie::build((name.to_string(), value.to_string()))
        .path("/")
        .secure(secure)
        .same_site(SameSite::Strict)
        .expires(expires)
        .build())
}

/// Absolute expiry of a cookie, if it has one
pub fn expires_at(cookie: &Cookie<'_>) -> Option<DateTime<Utc>> {
    cookie
        .expires_datetime()
        .and_then(|at| DateTime::from_timestamp(at.unix_timestamp(), 0))
}

fn to_offset(at: DateTime<Utc>) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(at.timestamp())
        .map_err(|e| TaskDeskError::StorageError(format!("Cookie expiry out of range: {}", e)))
}

/// Named cookies persisted on a key-value backend
pub struct CookieJar {
    store: Arc<dyn KeyValueStore>,
}

impl CookieJar {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(name: &str) -> String {
        format!("{}{}", KEY_PREFIX, name)
    }

    pub fn set(&self, cookie: &Cookie<'_>) -> Result<()> {
        self.store
            .set(&Self::key(cookie.name()), &cookie.encoded().to_string())
    }

    /// Live cookie by name. Expired or unreadable records are dropped.
    pub fn get(&self, name: &str, now: DateTime<Utc>) -> Result<Option<Cookie<'static>>> {
        let Some(raw) = self.store.get(&Self::key(name))? else {
            return Ok(None);
        };

        match Cookie::parse_encoded(raw) {
            Ok(cookie) if expires_at(&cookie).map_or(true, |at| now < at) => Ok(Some(cookie)),
            Ok(_) => {
                log::debug!("Cookie '{}' expired, removing", name);
                self.remove(name)?;
                Ok(None)
            }
            Err(e) => {
                log::warn!("Discarding unreadable cookie record '{}': {}", name, e);
                self.remove(name)?;
                Ok(None)
            }
        }
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        self.store.remove(&Self::key(name))
    }
}
