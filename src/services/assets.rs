//! Company assets

use serde_json::json;
use validator::Validate;

use super::models::{Asset, NewAsset};
use super::resource_path;
use crate::client::ApiClient;
use crate::error::Result;

/// Asset inventory management (`/assets`)
#[derive(Clone)]
pub struct AssetService {
    client: ApiClient,
}

impl AssetService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Asset>> {
        self.client.get("/assets").await
    }

    pub async fn create(&self, asset: &NewAsset) -> Result<Asset> {
        asset.validate()?;
        self.client.post("/assets", asset).await
    }

    pub async fn update(&self, id: &str, asset: &NewAsset) -> Result<Asset> {
        asset.validate()?;
        self.client.put(&resource_path("/assets", id)?, asset).await
    }

    /// Hand an asset to a user, or return it to the pool with `None`
    pub async fn assign(&self, id: &str, user_id: Option<&str>) -> Result<Asset> {
        let path = format!("{}/assign", resource_path("/assets", id)?);
        self.client.patch(&path, &json!({ "userId": user_id })).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&resource_path("/assets", id)?).await
    }
}

/// Assets held by the signed-in employee (`/employee/assets`)
#[derive(Clone)]
pub struct MyAssets {
    client: ApiClient,
}

impl MyAssets {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Asset>> {
        self.client.get("/employee/assets").await
    }
}
