//! View composition: routes, navigation and the role-dispatched dashboard

pub mod dashboard;
pub mod navigator;
pub mod routes;

// Re-export main components
pub use dashboard::{AdminDashboard, Dashboard, EmployeeDashboard, Overview, TeamLeadDashboard};
pub use navigator::{ChannelNavigator, HistoryNavigator, Navigator};
pub use routes::{navigation, resolve, NavItem, Resolution, Route};
