//! Abstract storage interface for pluggable persistence backends
//!
//! The durable store plays the role a browser's local storage plays for the
//! web dashboard: string values under string keys, surviving restarts.

use crate::error::Result;

/// Synchronous key-value persistence
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<()>;

    /// Backend name for logging/debugging
    fn backend_name(&self) -> &'static str;
}
