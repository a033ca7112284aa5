//! In-memory issue repository (non-persistent).

use super::{IssueRepository, RepositoryError};
use crate::model::Issue;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    issues: BTreeMap<i64, Issue>,
    last_id: i64,
}

/// Ids start at 1 and are never reused, like an autoincrement column.
#[derive(Clone, Default)]
pub struct InMemoryIssueRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryIssueRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IssueRepository for InMemoryIssueRepository {
    fn is_persistent(&self) -> bool {
        false
    }

    async fn create_issue(&self, issue: &Issue) -> Result<i64, RepositoryError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let id = inner.last_id;
        let stored = Issue {
            id,
            ..issue.clone()
        };
        inner.issues.insert(id, stored);
        Ok(id)
    }

    async fn get_issue(&self, id: i64) -> Result<Issue, RepositoryError> {
        self.inner
            .read()
            .await
            .issues
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update_issue(&self, issue: &Issue) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        let existing = inner
            .issues
            .get_mut(&issue.id)
            .ok_or(RepositoryError::NotFound)?;
        existing.title = issue.title.clone();
        existing.description = issue.description.clone();
        existing.status = issue.status.clone();
        Ok(())
    }

    async fn delete_issue(&self, id: i64) -> Result<(), RepositoryError> {
        self.inner
            .write()
            .await
            .issues
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_issues(&self) -> Result<Vec<Issue>, RepositoryError> {
        Ok(self.inner.read().await.issues.values().cloned().collect())
    }
}
