//! Role-dispatched dashboard
//!
//! The session's role is matched once, here, and each variant only carries
//! the services its role may call. Views below this point never branch on
//! the role again.

use crate::auth::user::{Role, Session};
use crate::client::ApiClient;
use crate::error::Result;
use crate::services::models::TaskStatus;
use crate::services::{
    AdminProjectService, AssetService, EmployeeTaskService, MyAssets, ProfileService,
    ReportService, TeamLeadService, UserService,
};

use super::routes::{navigation, NavItem, Route};

pub struct AdminDashboard {
    pub session: Session,
    pub users: UserService,
    pub projects: AdminProjectService,
    pub assets: AssetService,
    pub reports: ReportService,
    pub profile: ProfileService,
}

pub struct TeamLeadDashboard {
    pub session: Session,
    pub team: TeamLeadService,
    pub reports: ReportService,
    pub profile: ProfileService,
}

pub struct EmployeeDashboard {
    pub session: Session,
    pub tasks: EmployeeTaskService,
    pub assets: MyAssets,
    pub reports: ReportService,
    pub profile: ProfileService,
}

pub enum Dashboard {
    Admin(AdminDashboard),
    TeamLead(TeamLeadDashboard),
    Employee(EmployeeDashboard),
}

/// Headline numbers shown on a dashboard's landing view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    pub role: Role,
    pub counters: Vec<(&'static str, usize)>,
}

impl Dashboard {
    pub fn for_session(session: Session, client: &ApiClient) -> Self {
        let profile = ProfileService::new(client.clone());
        let reports = ReportService::new(client.clone());
        match session.role {
            Role::Admin => Dashboard::Admin(AdminDashboard {
                session,
                users: UserService::new(client.clone()),
                projects: AdminProjectService::new(client.clone()),
                assets: AssetService::new(client.clone()),
                reports,
                profile,
            }),
            Role::TeamLead => Dashboard::TeamLead(TeamLeadDashboard {
                session,
                team: TeamLeadService::new(client.clone()),
                reports,
                profile,
            }),
            Role::Employee => Dashboard::Employee(EmployeeDashboard {
                session,
                tasks: EmployeeTaskService::new(client.clone()),
                assets: MyAssets::new(client.clone()),
                reports,
                profile,
            }),
        }
    }

    pub fn session(&self) -> &Session {
        match self {
            Dashboard::Admin(d) => &d.session,
            Dashboard::TeamLead(d) => &d.session,
            Dashboard::Employee(d) => &d.session,
        }
    }

    pub fn role(&self) -> Role {
        self.session().role
    }

    pub fn home(&self) -> Route {
        self.role().home()
    }

    pub fn navigation(&self) -> Vec<NavItem> {
        navigation(self.role())
    }

    /// Fetch the landing view's counters. The requests are issued together
    /// and the first failure is returned.
    pub async fn overview(&self) -> Result<Overview> {
        let counters = match self {
            Dashboard::Admin(d) => {
                let (users, projects, assets, reports) = tokio::try_join!(
                    d.users.list(),
                    d.projects.list(),
                    d.assets.list(),
                    d.reports.list()
                )?;
                vec![
                    ("users", users.len()),
                    ("projects", projects.len()),
                    ("assets", assets.len()),
                    ("reports", reports.len()),
                ]
            }
            Dashboard::TeamLead(d) => {
                let (projects, employees, reports) =
                    tokio::try_join!(d.team.projects(), d.team.employees(), d.reports.list())?;
                vec![
                    ("projects", projects.len()),
                    ("employees", employees.len()),
                    ("reports", reports.len()),
                ]
            }
            Dashboard::Employee(d) => {
                let (tasks, assets, reports) =
                    tokio::try_join!(d.tasks.list(), d.assets.list(), d.reports.list())?;
                let done = tasks
                    .iter()
                    .filter(|t| t.status == TaskStatus::Done)
                    .count();
                vec![
                    ("open tasks", tasks.len() - done),
                    ("completed tasks", done),
                    ("assets", assets.len()),
                    ("reports", reports.len()),
                ]
            }
        };

        Ok(Overview {
            role: self.role(),
            counters,
        })
    }
}
