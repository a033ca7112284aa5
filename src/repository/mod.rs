//! Issue storage with pluggable backends.
//!
//! Supports:
//! - `sqlite`: SQLite database file (default)
//! - `memory`: In-memory storage (non-persistent, for testing)

mod memory;
mod sqlite;

pub use memory::InMemoryIssueRepository;
pub use sqlite::SqliteIssueRepository;

use crate::model::Issue;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by every repository backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No row matched the requested id.
    #[error("not found")]
    NotFound,

    /// Any other store failure, carrying the backend's message.
    #[error("{0}")]
    Storage(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound,
            other => Self::Storage(other.to_string()),
        }
    }
}

/// Issue repository trait - implemented by all storage backends.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Whether this repository persists data across restarts.
    fn is_persistent(&self) -> bool;

    /// Insert a new issue and return the id assigned by the store.
    async fn create_issue(&self, issue: &Issue) -> Result<i64, RepositoryError>;

    /// Get a single issue by id.
    async fn get_issue(&self, id: i64) -> Result<Issue, RepositoryError>;

    /// Replace title, description and status of the issue with `issue.id`.
    async fn update_issue(&self, issue: &Issue) -> Result<(), RepositoryError>;

    async fn delete_issue(&self, id: i64) -> Result<(), RepositoryError>;

    /// List all issues in insertion order.
    async fn list_issues(&self) -> Result<Vec<Issue>, RepositoryError>;
}

/// Repository backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    Memory,
    #[default]
    Sqlite,
}

impl StoreBackend {
    /// Parse a backend name, returning `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "sqlite" | "db" => Some(Self::Sqlite),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Create an issue repository based on backend and database path.
pub async fn create_issue_repository(
    backend: StoreBackend,
    db_path: PathBuf,
) -> Result<Arc<dyn IssueRepository>, RepositoryError> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(InMemoryIssueRepository::new())),
        StoreBackend::Sqlite => {
            let repo = SqliteIssueRepository::open(db_path).await?;
            Ok(Arc::new(repo))
        }
    }
}
