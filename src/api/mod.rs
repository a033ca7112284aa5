//! HTTP API for the issue tracker.
//!
//! ## Endpoints
//!
//! - `POST /issues` - Create an issue
//! - `GET /issues` - List all issues
//! - `GET /issues/{id}` - Get a single issue
//! - `PUT /issues/{id}` - Replace an issue's title, description and status
//! - `DELETE /issues/{id}` - Delete an issue
//! - `GET /health` - Health check

pub mod issues;
mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
pub use types::*;
