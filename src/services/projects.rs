//! Projects and tasks, one service per role

use serde_json::json;
use validator::Validate;

use super::models::{NewProject, NewTask, Project, Task, TaskStatus, User};
use super::resource_path;
use crate::client::ApiClient;
use crate::error::Result;

/// Project administration (`/admin/projects`)
#[derive(Clone)]
pub struct AdminProjectService {
    client: ApiClient,
}

impl AdminProjectService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        self.client.get("/admin/projects").await
    }

    pub async fn create(&self, project: &NewProject) -> Result<Project> {
        project.validate()?;
        self.client.post("/admin/projects", project).await
    }

    pub async fn update(&self, id: &str, project: &NewProject) -> Result<Project> {
        project.validate()?;
        self.client
            .put(&resource_path("/admin/projects", id)?, project)
            .await
    }

    pub async fn assign_team_lead(&self, id: &str, team_lead_id: &str) -> Result<Project> {
        let path = format!("{}/assign", resource_path("/admin/projects", id)?);
        self.client
            .patch(&path, &json!({ "teamLeadId": team_lead_id }))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete(&resource_path("/admin/projects", id)?)
            .await
    }
}

/// Projects led by the signed-in team lead and their tasks (`/teamlead`)
#[derive(Clone)]
pub struct TeamLeadService {
    client: ApiClient,
}

impl TeamLeadService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.client.get("/teamlead/projects").await
    }

    /// Employees that tasks can be assigned to
    pub async fn employees(&self) -> Result<Vec<User>> {
        self.client.get("/teamlead/employees").await
    }

    pub async fn create_task(&self, project_id: &str, task: &NewTask) -> Result<Task> {
        task.validate()?;
        let path = format!("{}/tasks", resource_path("/teamlead/projects", project_id)?);
        self.client.post(&path, task).await
    }

    pub async fn update_task(&self, id: &str, task: &NewTask) -> Result<Task> {
        task.validate()?;
        self.client
            .put(&resource_path("/teamlead/tasks", id)?, task)
            .await
    }

    pub async fn assign_task(&self, id: &str, employee_id: &str) -> Result<Task> {
        let path = format!("{}/assign", resource_path("/teamlead/tasks", id)?);
        self.client
            .patch(&path, &json!({ "employeeId": employee_id }))
            .await
    }

    pub async fn delete_task(&self, id: &str) -> Result<()> {
        self.client
            .delete(&resource_path("/teamlead/tasks", id)?)
            .await
    }
}

/// Tasks assigned to the signed-in employee (`/employee/tasks`)
#[derive(Clone)]
pub struct EmployeeTaskService {
    client: ApiClient,
}

impl EmployeeTaskService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Task>> {
        self.client.get("/employee/tasks").await
    }

    pub async fn set_status(&self, id: &str, status: TaskStatus) -> Result<Task> {
        let path = format!("{}/status", resource_path("/employee/tasks", id)?);
        self.client.patch(&path, &json!({ "status": status })).await
    }
}
