//! Issue CRUD endpoints.
//!
//! Status code mapping:
//! - malformed JSON body or non-numeric id → 400
//! - `GET /issues/:id` → 404 on any service error
//! - create, update, delete and list → 500 with the error message, including
//!   not-found on update/delete

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

use crate::model::Issue;
use crate::service::ServiceError;

use super::routes::AppState;
use super::types::CreateIssueResponse;

type ApiError = (StatusCode, String);

/// Create the issue routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/issues", get(list_issues).post(create_issue))
        .route(
            "/issues/:id",
            get(get_issue).put(update_issue).delete(delete_issue),
        )
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid issue ID".to_string()))
}

/// Decode a request body regardless of its content type.
fn decode_issue(body: &[u8]) -> Result<Issue, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected issue payload: {}", e);
        (
            StatusCode::BAD_REQUEST,
            "Invalid request payload".to_string(),
        )
    })
}

fn internal_error(err: ServiceError) -> ApiError {
    tracing::warn!("Issue request failed: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

/// POST /issues - Create an issue.
async fn create_issue(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let issue = decode_issue(&body)?;
    let id = state
        .service
        .create_issue(issue)
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(CreateIssueResponse { id })))
}

/// GET /issues/:id - Get a single issue.
async fn get_issue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Issue>, ApiError> {
    let id = parse_id(&id)?;
    state.service.get_issue(id).await.map(Json).map_err(|e| {
        tracing::debug!("Issue {} lookup failed: {}", id, e);
        (StatusCode::NOT_FOUND, "issue not found".to_string())
    })
}

/// PUT /issues/:id - Replace title, description and status.
async fn update_issue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let mut issue = decode_issue(&body)?;
    issue.id = id;

    state
        .service
        .update_issue(issue)
        .await
        .map_err(internal_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /issues/:id - Delete an issue.
async fn delete_issue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state
        .service
        .delete_issue(id)
        .await
        .map_err(internal_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /issues - List all issues.
async fn list_issues(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Issue>>, ApiError> {
    state
        .service
        .list_issues()
        .await
        .map(Json)
        .map_err(internal_error)
}
