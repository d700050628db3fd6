//! TaskDesk - client core for a role-based project management dashboard
//!
//! This library provides the session, authorization and REST plumbing
//! shared by every dashboard view: credential persistence, a single HTTP
//! gateway that handles expired sessions, role-gated routes and the
//! role-scoped resource services.

pub mod audit;
pub mod auth;
pub mod client;
pub mod clock;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod services;
pub mod storage;
pub mod views;

// Re-export main components
pub use client::ApiClient;
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{Result, TaskDeskError};
