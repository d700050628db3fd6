//! HTTP client wrapper
//!
//! Every backend call goes through [`ApiClient`]. It attaches the stored
//! credential as a bearer token, returns the decoded response body on success,
//! and turns a 401 into a forced logout plus a redirect to the login view.
//! No request is ever retried.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

use crate::auth::session::AuthSessionManager;
use crate::auth::token::TokenStore;
use crate::config::ClientConfig;
use crate::constants::REQUEST_ID_HEADER;
use crate::error::{Result, TaskDeskError};
use crate::views::{Navigator, Route};

/// How a 401 is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interception {
    /// The session credential was rejected: force logout
    Session,
    /// Login/register: the submitted credentials were rejected
    CredentialExchange,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<TokenStore>,
    session: Arc<AuthSessionManager>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        tokens: Arc<TokenStore>,
        session: Arc<AuthSessionManager>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("taskdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TaskDeskError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        log::info!("Created API client for {}", config.api_base_url);

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            tokens,
            session,
            navigator,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::GET, path, None, Interception::Session).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, Some(body), Interception::Session).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::PUT, path, Some(body), Interception::Session).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::PATCH, path, Some(body), Interception::Session).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::DELETE, path, None, Interception::Session).await
    }

    /// POST to a credential-exchange endpoint. A 401 here means the submitted
    /// credentials were wrong, so it is returned as `InvalidCredentials` and
    /// the session is left alone.
    pub(crate) async fn exchange<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, Some(body), Interception::CredentialExchange)
            .await
    }

    // The bearer token only ever goes to the configured API.
    fn endpoint(&self, path: &str) -> Result<Url> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path()) {
            return Err(TaskDeskError::Validation(format!(
                "'{}' is outside the API base URL",
                path
            )));
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        interception: Interception,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let request_id = Uuid::new_v4();

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(token) = self.tokens.get_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        log::debug!("[{}] {} {}", request_id, method, path);

        let response = request.send().await.map_err(|e| {
            log::warn!("[{}] {} {} failed: {}", request_id, method, path, e);
            TaskDeskError::Network(e.to_string())
        })?;
        let status = response.status();
        log::debug!("[{}] {} {} -> {}", request_id, method, path, status);

        // A 401 is acted on from the status line alone; its body is optional.
        if status == StatusCode::UNAUTHORIZED {
            return Err(match interception {
                Interception::Session => {
                    self.handle_unauthorized(path);
                    TaskDeskError::Unauthorized
                }
                Interception::CredentialExchange => {
                    let bytes = response.bytes().await.unwrap_or_default();
                    TaskDeskError::InvalidCredentials(
                        extract_message(&bytes)
                            .unwrap_or_else(|| "Invalid email or password".to_string()),
                    )
                }
            });
        }

        if status.is_success() {
            let bytes = response.bytes().await?;
            return decode_body(&bytes);
        }

        let bytes = response.bytes().await.unwrap_or_default();
        Err(error_for_status(status, &bytes))
    }

    // Runs once per rejected response: session and credential are cleared
    // before the login redirect is emitted.
    fn handle_unauthorized(&self, path: &str) {
        self.session.invalidate(path);
        self.navigator.navigate(Route::Login);
    }
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(bytes)?)
}

/// Server-provided message from a JSON error body (`message`, then `error`)
fn extract_message(bytes: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(bytes).ok()?;
    ["message", "error"].iter().find_map(|field| {
        value
            .get(field)
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
            .map(str::to_string)
    })
}

/// Map a non-success, non-401 response to the error taxonomy
fn error_for_status(status: StatusCode, bytes: &[u8]) -> TaskDeskError {
    let message = extract_message(bytes);
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => TaskDeskError::Validation(
            message.unwrap_or_else(|| "The request contained invalid data".to_string()),
        ),
        StatusCode::FORBIDDEN => TaskDeskError::Forbidden(
            message.unwrap_or_else(|| "insufficient permissions".to_string()),
        ),
        StatusCode::NOT_FOUND => TaskDeskError::NotFound(
            message.unwrap_or_else(|| "The requested resource does not exist".to_string()),
        ),
        StatusCode::CONFLICT => TaskDeskError::Conflict(
            message.unwrap_or_else(|| "The resource was modified or already exists".to_string()),
        ),
        s if s.is_server_error() => TaskDeskError::Server {
            status: s.as_u16(),
            message,
        },
        s => TaskDeskError::Http {
            status: s.as_u16(),
            message,
        },
    }
}
