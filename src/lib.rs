//! # Issue Tracker
//!
//! A small REST service for creating, reading, updating, deleting and listing
//! issues.
//!
//! ## Architecture
//!
//! ```text
//!   HTTP request
//!        │
//!        ▼
//!  ┌───────────┐   decode JSON, parse ids, map errors to status codes
//!  │    api    │
//!  └─────┬─────┘
//!        ▼
//!  ┌───────────┐   title required on create, status allow-list on update
//!  │  service  │
//!  └─────┬─────┘
//!        ▼
//!  ┌────────────┐  SQLite or in-memory storage
//!  │ repository │
//!  └────────────┘
//! ```
//!
//! ## Modules
//! - `model`: The `Issue` entity and its status values
//! - `repository`: Storage trait and backends
//! - `service`: Business rules
//! - `api`: axum router and handlers
//! - `config`: YAML configuration with environment overrides

pub mod api;
pub mod config;
pub mod model;
pub mod repository;
pub mod service;

pub use config::Config;
pub use model::{Issue, IssueStatus};
pub use repository::{IssueRepository, RepositoryError};
pub use service::{IssueService, ServiceError, TrackerService};
