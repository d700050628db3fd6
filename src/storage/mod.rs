//! Local persistence for credentials and the session record

pub mod file;
pub mod jar;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use jar::{expires_at, session_cookie, CookieJar};
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
