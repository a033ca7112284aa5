//! Business rules between the HTTP layer and the repository.
//!
//! Only two rules exist: a created issue needs a title and always starts as
//! `open`, and an updated issue must carry one of the allowed statuses. Any
//! allowed status is accepted on update regardless of the current one.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Issue, IssueStatus};
use crate::repository::{IssueRepository, RepositoryError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("title is required")]
    TitleRequired,

    #[error("invalid status")]
    InvalidStatus(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Operations the HTTP handlers depend on.
#[async_trait]
pub trait IssueService: Send + Sync {
    async fn create_issue(&self, issue: Issue) -> Result<i64, ServiceError>;
    async fn get_issue(&self, id: i64) -> Result<Issue, ServiceError>;
    async fn update_issue(&self, issue: Issue) -> Result<(), ServiceError>;
    async fn delete_issue(&self, id: i64) -> Result<(), ServiceError>;
    async fn list_issues(&self) -> Result<Vec<Issue>, ServiceError>;
}

/// Shared service handle.
pub type SharedIssueService = Arc<dyn IssueService>;

/// [`IssueService`] backed by an [`IssueRepository`].
pub struct TrackerService {
    repo: Arc<dyn IssueRepository>,
}

impl TrackerService {
    pub fn new(repo: Arc<dyn IssueRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl IssueService for TrackerService {
    async fn create_issue(&self, mut issue: Issue) -> Result<i64, ServiceError> {
        if issue.title.is_empty() {
            return Err(ServiceError::TitleRequired);
        }
        issue.status = IssueStatus::Open.to_string();

        let id = self.repo.create_issue(&issue).await?;
        tracing::debug!("Created issue {}", id);
        Ok(id)
    }

    async fn get_issue(&self, id: i64) -> Result<Issue, ServiceError> {
        Ok(self.repo.get_issue(id).await?)
    }

    async fn update_issue(&self, issue: Issue) -> Result<(), ServiceError> {
        if issue.status.parse::<IssueStatus>().is_err() {
            return Err(ServiceError::InvalidStatus(issue.status));
        }

        self.repo.update_issue(&issue).await?;
        tracing::debug!("Updated issue {} (status={})", issue.id, issue.status);
        Ok(())
    }

    async fn delete_issue(&self, id: i64) -> Result<(), ServiceError> {
        self.repo.delete_issue(id).await?;
        tracing::debug!("Deleted issue {}", id);
        Ok(())
    }

    async fn list_issues(&self) -> Result<Vec<Issue>, ServiceError> {
        Ok(self.repo.list_issues().await?)
    }
}
