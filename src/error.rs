use std::error::Error;
use std::fmt;
use std::sync::PoisonError;

#[derive(Debug)]
pub enum TaskDeskError {
    // Session state errors
    StateLock(String),

    // Auth errors
    Unauthorized,
    InvalidCredentials(String),
    Forbidden(String),

    // Request errors passed through from the backend
    Validation(String),
    NotFound(String),
    Conflict(String),
    Server { status: u16, message: Option<String> },
    Http { status: u16, message: Option<String> },

    // No response received
    Network(String),

    // Local errors
    StorageError(String),
    SerializationError(String),
    ConfigError(String),
}

impl TaskDeskError {
    /// True for the one kind the HTTP client handles itself
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Message supplied by the backend, if the failure carried one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::InvalidCredentials(msg)
            | Self::Forbidden(msg)
            | Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => Some(msg.as_str()),
            Self::Server { message, .. } | Self::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for TaskDeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateLock(msg) => write!(f, "Session state lock error: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized: please log in again"),
            Self::InvalidCredentials(msg) => write!(f, "{}", msg),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Self::Validation(msg) => write!(f, "Validation error: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::Server { status, message } => match message {
                Some(msg) => write!(f, "Server error ({}): {}", status, msg),
                None => write!(f, "Server error ({})", status),
            },
            Self::Http { status, message } => match message {
                Some(msg) => write!(f, "Request failed ({}): {}", status, msg),
                None => write!(f, "Request failed with status {}", status),
            },
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for TaskDeskError {}

// Converting from PoisonError to facilitate poisoned lock handling
impl<T> From<PoisonError<T>> for TaskDeskError {
    fn from(err: PoisonError<T>) -> Self {
        TaskDeskError::StateLock(format!("Lock poisoned: {}", err))
    }
}

impl From<serde_json::Error> for TaskDeskError {
    fn from(err: serde_json::Error) -> Self {
        TaskDeskError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for TaskDeskError {
    fn from(err: std::io::Error) -> Self {
        TaskDeskError::StorageError(err.to_string())
    }
}

impl From<reqwest::Error> for TaskDeskError {
    fn from(err: reqwest::Error) -> Self {
        TaskDeskError::Network(err.to_string())
    }
}

impl From<url::ParseError> for TaskDeskError {
    fn from(err: url::ParseError) -> Self {
        TaskDeskError::ConfigError(format!("Invalid URL: {}", err))
    }
}

impl From<validator::ValidationErrors> for TaskDeskError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match (&e.message, &*e.code) {
                    (Some(message), _) => message.to_string(),
                    (None, "blank") => format!("{} is required", field),
                    (None, _) => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        TaskDeskError::Validation(messages.join("; "))
    }
}

// Generic result type for TaskDesk
pub type Result<T> = std::result::Result<T, TaskDeskError>;
