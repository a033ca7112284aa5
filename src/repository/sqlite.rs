//! SQLite-based issue repository.

use super::{IssueRepository, RepositoryError};
use crate::model::Issue;
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS issues (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'open'
);
"#;

const SELECT_COLUMNS: &str = "SELECT id, title, description, status FROM issues";

pub struct SqliteIssueRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteIssueRepository {
    /// Open (or create) the database at `db_path` and apply the schema.
    pub async fn open(db_path: PathBuf) -> Result<Self, RepositoryError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                RepositoryError::Storage(format!("Failed to create database dir: {}", e))
            })?;
        }

        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path).map_err(|e| {
                RepositoryError::Storage(format!("Failed to open SQLite database: {}", e))
            })?;
            conn.execute_batch(SCHEMA)
                .map_err(|e| RepositoryError::Storage(format!("Failed to run schema: {}", e)))?;
            tracing::debug!("Opened issue database at {}", db_path.display());
            Ok::<_, RepositoryError>(conn)
        })
        .await
        .map_err(|e| RepositoryError::Storage(format!("Task join error: {}", e)))??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, RepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, RepositoryError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            f(&conn)
        })
        .await
        .map_err(|e| RepositoryError::Storage(e.to_string()))?
    }
}

fn issue_from_row(row: &Row<'_>) -> rusqlite::Result<Issue> {
    Ok(Issue {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
    })
}

#[async_trait]
impl IssueRepository for SqliteIssueRepository {
    fn is_persistent(&self) -> bool {
        true
    }

    async fn create_issue(&self, issue: &Issue) -> Result<i64, RepositoryError> {
        let issue = issue.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO issues (title, description, status) VALUES (?1, ?2, ?3)",
                params![issue.title, issue.description, issue.status],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    async fn get_issue(&self, id: i64) -> Result<Issue, RepositoryError> {
        self.with_conn(move |conn| {
            let issue = conn.query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                issue_from_row,
            )?;
            Ok(issue)
        })
        .await
    }

    async fn update_issue(&self, issue: &Issue) -> Result<(), RepositoryError> {
        let issue = issue.clone();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE issues SET title = ?1, description = ?2, status = ?3 WHERE id = ?4",
                params![issue.title, issue.description, issue.status, issue.id],
            )?;
            if changed == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
        .await
    }

    async fn delete_issue(&self, id: i64) -> Result<(), RepositoryError> {
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM issues WHERE id = ?1", params![id])?;
            if changed == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
        .await
    }

    async fn list_issues(&self) -> Result<Vec<Issue>, RepositoryError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))?;
            let issues = stmt
                .query_map([], issue_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(issues)
        })
        .await
    }
}
