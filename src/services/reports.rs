//! Reports. Every role uses the same endpoints; the backend returns only the
//! reports the caller may see.

use serde_json::json;
use validator::Validate;

use super::models::{NewReport, Report, ReportStatus};
use super::resource_path;
use crate::client::ApiClient;
use crate::error::Result;

#[derive(Clone)]
pub struct ReportService {
    client: ApiClient,
}

impl ReportService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Report>> {
        self.client.get("/reports").await
    }

    pub async fn get(&self, id: &str) -> Result<Report> {
        self.client.get(&resource_path("/reports", id)?).await
    }

    pub async fn submit(&self, report: &NewReport) -> Result<Report> {
        report.validate()?;
        self.client.post("/reports", report).await
    }

    pub async fn set_status(&self, id: &str, status: ReportStatus) -> Result<Report> {
        let path = format!("{}/status", resource_path("/reports", id)?);
        self.client.patch(&path, &json!({ "status": status })).await
    }
}
