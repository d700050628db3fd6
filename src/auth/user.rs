use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TaskDeskError;

/// Permission level of a dashboard user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    TeamLead,
    Employee,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::TeamLead, Role::Employee];

    /// Wire name, as the backend sends it
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::TeamLead => "teamlead",
            Role::Employee => "employee",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::TeamLead => "Team Lead",
            Role::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TaskDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "teamlead" | "team_lead" | "team-lead" => Ok(Role::TeamLead),
            "employee" => Ok(Role::Employee),
            other => Err(TaskDeskError::Validation(format!("Unknown role '{}'", other))),
        }
    }
}

/// The currently authenticated identity. The role is fixed for the lifetime
/// of the session; a role change only shows up after logging in again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

/// Durable record the session is rehydrated from at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedUser {
    pub token: String,
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl PersistedUser {
    pub fn new(token: &str, session: &Session) -> Self {
        Self {
            token: token.to_string(),
            id: session.user_id.clone(),
            name: session.name.clone(),
            email: session.email.clone(),
            role: session.role,
        }
    }

    pub fn session(&self) -> Session {
        Session {
            user_id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}
