//! Client configuration module
//! Handles the runtime parameters of the dashboard client

use crate::constants::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_STATE_DIR, DEFAULT_TOKEN_TTL_DAYS,
};
use crate::error::{Result, TaskDeskError};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Client configuration parameters
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend
    pub api_base_url: Url,
    /// Directory holding the durable state and cookie files
    pub state_dir: PathBuf,
    /// Lifetime of a stored credential, in days
    pub token_ttl_days: i64,
    pub request_timeout: Duration,
    /// Mark the credential cookie `secure`
    pub secure_cookie: bool,
}

impl ClientConfig {
    /// Build a configuration for the given backend with default settings
    pub fn new(api_base_url: &str) -> Result<Self> {
        let api_base_url = Self::parse_base_url(api_base_url)?;
        Ok(Self {
            api_base_url,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            token_ttl_days: DEFAULT_TOKEN_TTL_DAYS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            secure_cookie: true,
        })
    }

    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = dir.into();
        self
    }

    pub fn with_token_ttl_days(mut self, days: i64) -> Self {
        self.token_ttl_days = days;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Only http and https backends are accepted. A trailing slash is forced so
    /// relative endpoint paths join under the base path.
    fn parse_base_url(raw: &str) -> Result<Url> {
        let mut url = Url::parse(raw.trim())?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(TaskDeskError::ConfigError(format!(
                "API URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Check the values that cannot be expressed in the types
    pub fn validate(&self) -> Result<()> {
        if self.token_ttl_days < 1 {
            return Err(TaskDeskError::ConfigError(
                "Token lifetime must be at least one day".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(TaskDeskError::ConfigError(
                "Request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_base_url = env::var("TASKDESK_API_URL").map_err(|_| {
            TaskDeskError::ConfigError(
                "TASKDESK_API_URL environment variable is required \
                 (e.g. http://localhost:5000/api)"
                    .to_string(),
            )
        })?;

        let state_dir = env::var("TASKDESK_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_DIR));

        let token_ttl_days = match env::var("TASKDESK_TOKEN_TTL_DAYS") {
            Ok(raw) => parse_whole("TASKDESK_TOKEN_TTL_DAYS", &raw, "days")?,
            Err(_) => DEFAULT_TOKEN_TTL_DAYS,
        };

        let timeout_secs = match env::var("TASKDESK_REQUEST_TIMEOUT") {
            Ok(raw) => parse_whole("TASKDESK_REQUEST_TIMEOUT", &raw, "seconds")?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let secure_cookie = env::var("TASKDESK_SECURE_COOKIE")
            .map(|v| !(v.to_lowercase() == "false" || v == "0"))
            .unwrap_or(true);

        let config = Self {
            api_base_url: Self::parse_base_url(&api_base_url)?,
            state_dir,
            token_ttl_days,
            request_timeout: Duration::from_secs(timeout_secs),
            secure_cookie,
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_whole<T: FromStr>(var: &str, raw: &str, unit: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        TaskDeskError::ConfigError(format!(
            "{} must be a whole number of {}, got '{}'",
            var, unit, raw
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_defaults() {
        let config = ClientConfig::new("http://localhost:5000/api").unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:5000/api/");
        assert_eq!(config.token_ttl_days, DEFAULT_TOKEN_TTL_DAYS);
        assert!(config.secure_cookie);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = ClientConfig::new("ftp://example.com");
        assert!(matches!(result, Err(TaskDeskError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let config = ClientConfig::new("http://localhost:5000")
            .unwrap()
            .with_token_ttl_days(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_numeric_settings_reject_garbage() {
        let ttl: i64 = parse_whole("TASKDESK_TOKEN_TTL_DAYS", " 14 ", "days").unwrap();
        assert_eq!(ttl, 14);

        let err = parse_whole::<u64>("TASKDESK_REQUEST_TIMEOUT", "soon", "seconds").unwrap_err();
        assert!(matches!(err, TaskDeskError::ConfigError(_)));
        assert!(err.to_string().contains("TASKDESK_REQUEST_TIMEOUT"));
    }

    #[test]
    fn test_from_env_requires_api_url() {
        env::remove_var("TASKDESK_API_URL");

        let result = ClientConfig::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("TASKDESK_API_URL"));
    }
}
