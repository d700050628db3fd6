//! Credential exchange endpoints

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::models::{not_blank, User};
use crate::auth::session::AuthApi;
use crate::client::ApiClient;
use crate::error::Result;

#[derive(Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Passwords stay out of debug output and logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Self-service sign-up. The backend assigns the role.
#[derive(Clone, Serialize, Validate)]
pub struct Registration {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// `{ token, user }` returned by login and register
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.exchange("/users/login", credentials).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        self.exchange("/users/register", registration).await
    }
}
