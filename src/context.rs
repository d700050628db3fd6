//! Application context
//!
//! Owns the process-wide auth state (token store and session) and hands it to
//! the HTTP client, services and views explicitly. Built once at startup,
//! which is also when a persisted session is rehydrated.

use std::sync::Arc;

use crate::auth::session::{AuthSessionManager, AuthState};
use crate::auth::token::TokenStore;
use crate::auth::user::Session;
use crate::client::ApiClient;
use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::constants::{COOKIE_FILE_NAME, STATE_FILE_NAME};
use crate::error::Result;
use crate::services::auth::{Credentials, Registration};
use crate::storage::{CookieJar, FileStore, KeyValueStore};
use crate::views::{resolve, Dashboard, Navigator, Resolution, Route};

pub struct AppContext {
    config: ClientConfig,
    tokens: Arc<TokenStore>,
    session: Arc<AuthSessionManager>,
    client: ApiClient,
    navigator: Arc<dyn Navigator>,
}

impl AppContext {
    /// Wire the context on file-backed storage under `config.state_dir`
    pub fn bootstrap(config: ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let durable = Arc::new(FileStore::open(config.state_dir.join(STATE_FILE_NAME))?);
        let cookies = Arc::new(FileStore::open(config.state_dir.join(COOKIE_FILE_NAME))?);
        Self::with_storage(config, durable, cookies, Arc::new(SystemClock), navigator)
    }

    /// Wire the context on caller-provided storage and clock
    pub fn with_storage(
        config: ClientConfig,
        durable: Arc<dyn KeyValueStore>,
        cookie_store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        config.validate()?;

        let tokens = Arc::new(
            TokenStore::new(durable.clone(), CookieJar::new(cookie_store), clock)
                .with_secure_cookie(config.secure_cookie),
        );
        let session = Arc::new(AuthSessionManager::new(
            tokens.clone(),
            durable,
            config.token_ttl_days,
        ));
        let client = ApiClient::new(&config, tokens.clone(), session.clone(), navigator.clone())?;

        match session.rehydrate() {
            Some(restored) => log::info!("Resumed session for {} ({})", restored.email, restored.role),
            None => log::debug!("No persisted session to resume"),
        }

        Ok(Self {
            config,
            tokens,
            session,
            client,
            navigator,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn session(&self) -> &AuthSessionManager {
        &self.session
    }

    pub fn auth_state(&self) -> AuthState {
        self.session.state()
    }

    pub fn current_user(&self) -> Option<Session> {
        self.session.current_user()
    }

    /// Log in and land on the role's home view
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let session = self.session.login(&self.client, credentials).await?;
        self.navigator.navigate(session.role.home());
        Ok(session)
    }

    pub async fn register(&self, registration: &Registration) -> Result<Session> {
        let session = self.session.register(&self.client, registration).await?;
        self.navigator.navigate(session.role.home());
        Ok(session)
    }

    pub fn logout(&self) {
        self.session.logout();
        self.navigator.navigate(Route::Login);
    }

    /// Run the guard for `route` and navigate to wherever it leads
    pub fn navigate(&self, route: Route) -> Resolution {
        let resolution = resolve(route, self.current_user().as_ref());
        self.navigator.navigate(resolution.target());
        resolution
    }

    /// Role-specific services for the signed-in user
    pub fn dashboard(&self) -> Option<Dashboard> {
        self.current_user()
            .map(|session| Dashboard::for_session(session, &self.client))
    }
}
