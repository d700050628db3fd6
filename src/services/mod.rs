//! Role-scoped resource services
//!
//! Each service is a thin typed layer over [`ApiClient`](crate::client::ApiClient).
//! The backend scopes results by the caller's role; the services only decide
//! which endpoint family a role talks to.

pub mod assets;
pub mod auth;
pub mod models;
pub mod projects;
pub mod reports;
pub mod users;

pub use assets::{AssetService, MyAssets};
pub use auth::{AuthResponse, Credentials, Registration};
pub use projects::{AdminProjectService, EmployeeTaskService, TeamLeadService};
pub use reports::ReportService;
pub use users::{ProfileService, UserService};

use crate::error::{Result, TaskDeskError};

/// `{prefix}/{id}` after checking the id cannot escape its path segment
pub(crate) fn resource_path(prefix: &str, id: &str) -> Result<String> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(TaskDeskError::Validation(format!("Invalid resource id '{}'", id)));
    }
    Ok(format!("{}/{}", prefix, id))
}
