// Credential persistence
pub const TOKEN_COOKIE_NAME: &str = "token";
pub const TOKEN_STORAGE_KEY: &str = "auth_token";
pub const USER_RECORD_KEY: &str = "user";
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

// Client configuration defaults
pub const DEFAULT_STATE_DIR: &str = ".taskdesk";
pub const STATE_FILE_NAME: &str = "state.json";
pub const COOKIE_FILE_NAME: &str = "cookies.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Request tracing
pub const REQUEST_ID_HEADER: &str = "x-request-id";
