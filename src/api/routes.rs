//! Router assembly and server lifecycle.

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::repository::{self, StoreBackend};
use crate::service::{SharedIssueService, TrackerService};

use super::issues;
use super::types::HealthResponse;

/// Shared application state.
pub struct AppState {
    /// Business-rule layer the handlers call into
    pub service: SharedIssueService,
    /// Backend behind the service, reported by `/health`
    pub store: StoreBackend,
}

impl AppState {
    pub fn new(service: SharedIssueService, store: StoreBackend) -> Self {
        Self { service, store }
    }
}

/// Build the application router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(issues::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let backend = config.store_backend()?;
    let repo =
        repository::create_issue_repository(backend, config.storage.sqlite.path.clone()).await?;
    if repo.is_persistent() {
        tracing::info!(
            "Issue store: {} ({})",
            backend.as_str(),
            config.storage.sqlite.path.display()
        );
    } else {
        tracing::warn!("Issue store: {} (data is lost on restart)", backend.as_str());
    }

    let service: SharedIssueService = Arc::new(TrackerService::new(repo));
    let state = Arc::new(AppState::new(service, backend));
    let app = router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Issue;
    use crate::repository::{InMemoryIssueRepository, IssueRepository};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let repo: Arc<dyn IssueRepository> = Arc::new(InMemoryIssueRepository::new());
        let service: SharedIssueService = Arc::new(TrackerService::new(repo));
        router(Arc::new(AppState::new(service, StoreBackend::Memory)))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Vec<u8>) {
        let body = body
            .map(|b| Body::from(b.to_string()))
            .unwrap_or_else(Body::empty);
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, body) = send(&app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.store, "memory");
    }

    #[tokio::test]
    async fn test_create_then_get_forces_open() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/issues",
            Some(r#"{"title":"T","description":"D","status":"ignored"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let id = created["id"].as_i64().expect("id should be an integer");

        let (status, body) = send(&app, "GET", &format!("/issues/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            fetched,
            serde_json::json!({"id": id, "title": "T", "description": "D", "status": "open"})
        );
    }

    #[tokio::test]
    async fn test_create_with_null_description() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/issues",
            Some(r#"{"title":"T","description":null}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = serde_json::from_slice::<serde_json::Value>(&body).unwrap()["id"]
            .as_i64()
            .unwrap();

        let (status, body) = send(&app, "GET", &format!("/issues/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(fetched["description"], "");
        assert_eq!(fetched["status"], "open");
    }

    #[tokio::test]
    async fn test_create_with_capitalized_keys() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/issues",
            Some(r#"{"Title":"T","Description":"D"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = serde_json::from_slice::<serde_json::Value>(&body).unwrap()["id"]
            .as_i64()
            .unwrap();

        let (_, body) = send(&app, "GET", &format!("/issues/{}", id), None).await;
        let fetched: Issue = serde_json::from_slice(&body).unwrap();
        assert_eq!(fetched.title, "T");
        assert_eq!(fetched.description, "D");
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let app = app();

        let (_, body) = send(&app, "POST", "/issues", Some(r#"{"title":"first"}"#)).await;
        let id = serde_json::from_slice::<serde_json::Value>(&body).unwrap()["id"]
            .as_i64()
            .unwrap();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/issues/{}", id),
            Some(r#"{"id":999,"title":"renamed","description":"x","status":"in_progress"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());

        let (status, body) = send(&app, "GET", "/issues", None).await;
        assert_eq!(status, StatusCode::OK);
        let issues: Vec<Issue> = serde_json::from_slice(&body).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, id, "path id wins over body id");
        assert_eq!(issues[0].title, "renamed");
        assert_eq!(issues[0].status, "in_progress");

        let (status, _) = send(&app, "DELETE", &format!("/issues/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", &format!("/issues/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_list_is_array() {
        let app = app();
        let (status, body) = send(&app, "GET", "/issues", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn test_missing_issue_status_codes() {
        let app = app();

        let (status, _) = send(&app, "GET", "/issues/41", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            "PUT",
            "/issues/41",
            Some(r#"{"title":"x","status":"open"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, b"not found");

        let (status, _) = send(&app, "DELETE", "/issues/41", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
