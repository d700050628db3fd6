//! User administration and the signed-in user's profile

use serde_json::json;
use validator::Validate;

use super::models::{NewUser, User, UserUpdate};
use super::resource_path;
use crate::auth::user::Role;
use crate::client::ApiClient;
use crate::error::Result;

#[derive(Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.client.get("/users").await
    }

    pub async fn get(&self, id: &str) -> Result<User> {
        self.client.get(&resource_path("/users", id)?).await
    }

    pub async fn create(&self, user: &NewUser) -> Result<User> {
        user.validate()?;
        self.client.post("/users", user).await
    }

    pub async fn update(&self, id: &str, update: &UserUpdate) -> Result<User> {
        update.validate()?;
        self.client.put(&resource_path("/users", id)?, update).await
    }

    /// Change a user's role. The affected user keeps their old role until
    /// they log in again.
    pub async fn set_role(&self, id: &str, role: Role) -> Result<User> {
        let path = format!("{}/role", resource_path("/users", id)?);
        self.client.patch(&path, &json!({ "role": role })).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&resource_path("/users", id)?).await
    }
}

/// The signed-in user's own record (`/users/me`), open to every role
#[derive(Clone)]
pub struct ProfileService {
    client: ApiClient,
}

impl ProfileService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Profile as the backend currently sees it. The role here may be newer
    /// than the session's role.
    pub async fn me(&self) -> Result<User> {
        self.client.get("/users/me").await
    }

    pub async fn update(&self, update: &UserUpdate) -> Result<User> {
        update.validate()?;
        self.client.put("/users/me", update).await
    }
}
