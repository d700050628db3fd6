//! Typed dashboard routes and their access rules

use std::fmt;

use crate::audit::{self, AuthEvent};
use crate::auth::guard::{check, Access};
use crate::auth::user::{Role, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Forbidden,
    Profile,

    AdminDashboard,
    AdminUsers,
    AdminProjects,
    AdminAssets,
    AdminReports,

    TeamLeadDashboard,
    TeamLeadProjects,
    TeamLeadTasks,
    TeamLeadReports,

    EmployeeDashboard,
    EmployeeTasks,
    EmployeeAssets,
    EmployeeReports,
}

impl Route {
    pub const ALL: [Route; 17] = [
        Route::Login,
        Route::Register,
        Route::Forbidden,
        Route::Profile,
        Route::AdminDashboard,
        Route::AdminUsers,
        Route::AdminProjects,
        Route::AdminAssets,
        Route::AdminReports,
        Route::TeamLeadDashboard,
        Route::TeamLeadProjects,
        Route::TeamLeadTasks,
        Route::TeamLeadReports,
        Route::EmployeeDashboard,
        Route::EmployeeTasks,
        Route::EmployeeAssets,
        Route::EmployeeReports,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Forbidden => "/forbidden",
            Route::Profile => "/profile",
            Route::AdminDashboard => "/admin",
            Route::AdminUsers => "/admin/users",
            Route::AdminProjects => "/admin/projects",
            Route::AdminAssets => "/admin/assets",
            Route::AdminReports => "/admin/reports",
            Route::TeamLeadDashboard => "/teamlead",
            Route::TeamLeadProjects => "/teamlead/projects",
            Route::TeamLeadTasks => "/teamlead/tasks",
            Route::TeamLeadReports => "/teamlead/reports",
            Route::EmployeeDashboard => "/employee",
            Route::EmployeeTasks => "/employee/tasks",
            Route::EmployeeAssets => "/employee/assets",
            Route::EmployeeReports => "/employee/reports",
        }
    }

    /// Match a path, ignoring a trailing slash and any query string
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Route::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Views reachable without a session
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register | Route::Forbidden)
    }

    /// Roles allowed to open this view. Empty for public views.
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            Route::Login | Route::Register | Route::Forbidden => &[],
            Route::Profile => &Role::ALL,
            Route::AdminDashboard
            | Route::AdminUsers
            | Route::AdminProjects
            | Route::AdminAssets
            | Route::AdminReports => &[Role::Admin],
            Route::TeamLeadDashboard
            | Route::TeamLeadProjects
            | Route::TeamLeadTasks
            | Route::TeamLeadReports => &[Role::TeamLead],
            Route::EmployeeDashboard
            | Route::EmployeeTasks
            | Route::EmployeeAssets
            | Route::EmployeeReports => &[Role::Employee],
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl Role {
    /// Landing view after login
    pub fn home(&self) -> Route {
        match self {
            Role::Admin => Route::AdminDashboard,
            Role::TeamLead => Route::TeamLeadDashboard,
            Role::Employee => Route::EmployeeDashboard,
        }
    }
}

/// Menu entry in the dashboard sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

const fn item(label: &'static str, route: Route) -> NavItem {
    NavItem { label, route }
}

/// Sidebar entries for a role
pub fn navigation(role: Role) -> Vec<NavItem> {
    let mut items = match role {
        Role::Admin => vec![
            item("Dashboard", Route::AdminDashboard),
            item("Users", Route::AdminUsers),
            item("Projects", Route::AdminProjects),
            item("Assets", Route::AdminAssets),
            item("Reports", Route::AdminReports),
        ],
        Role::TeamLead => vec![
            item("Dashboard", Route::TeamLeadDashboard),
            item("Projects", Route::TeamLeadProjects),
            item("Tasks", Route::TeamLeadTasks),
            item("Reports", Route::TeamLeadReports),
        ],
        Role::Employee => vec![
            item("Dashboard", Route::EmployeeDashboard),
            item("My Tasks", Route::EmployeeTasks),
            item("My Assets", Route::EmployeeAssets),
            item("Reports", Route::EmployeeReports),
        ],
    };
    items.push(item("Profile", Route::Profile));
    items
}

/// What the view layer should do with a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
}

impl Resolution {
    /// The view that ends up on screen
    pub fn target(&self) -> Route {
        match self {
            Resolution::Render(route) | Resolution::Redirect(route) => *route,
        }
    }
}

/// Gate `route` on the session. Missing session goes to login, wrong role
/// goes to the forbidden view, and signed-in users skip login/register.
pub fn resolve(route: Route, session: Option<&Session>) -> Resolution {
    if route.is_public() {
        return match (route, session) {
            (Route::Login | Route::Register, Some(session)) => {
                Resolution::Redirect(session.role.home())
            }
            _ => Resolution::Render(route),
        };
    }

    match check(session, route.required_roles()) {
        Access::Granted => Resolution::Render(route),
        Access::Unauthenticated => {
            audit::record(&AuthEvent::AccessDenied {
                user_id: None,
                route: route.path().to_string(),
                reason: "not signed in",
            });
            Resolution::Redirect(Route::Login)
        }
        Access::Forbidden => {
            audit::record(&AuthEvent::AccessDenied {
                user_id: session.map(|s| s.user_id.clone()),
                route: route.path().to_string(),
                reason: "role not permitted",
            });
            Resolution::Redirect(Route::Forbidden)
        }
    }
}
