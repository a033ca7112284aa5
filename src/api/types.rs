//! API request and response types.

use serde::{Deserialize, Serialize};

/// Response after creating an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIssueResponse {
    /// Identifier assigned by the store
    pub id: i64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Storage backend in use (`sqlite` or `memory`)
    pub store: String,
}
