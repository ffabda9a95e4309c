use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    Json,
};
use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateIssueRequest, Issue, IssueListQuery, MoveIssueRequest, UpdateIssueRequest};
use crate::AppState;

/// `GET /issues` — query string is parsed by hand rather than via axum's
/// `Query` extractor so repeated keys (`status=Todo&status=Done`) collapse
/// into one `Vec` the same way comma-separated values do.
pub async fn list_issues(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
    axum::extract::Extension(token): axum::extract::Extension<CancellationToken>,
) -> ApiResult<Json<Vec<Issue>>> {
    let filter = IssueListQuery::from_raw(raw.as_deref().unwrap_or(""));
    let issues = state.repository.list_issues(&filter, &token).await?;
    Ok(Json(issues))
}

pub async fn create_issue(
    State(state): State<AppState>,
    axum::extract::Extension(token): axum::extract::Extension<CancellationToken>,
    Json(req): Json<CreateIssueRequest>,
) -> ApiResult<(StatusCode, Json<Issue>)> {
    req.validate().map_err(ApiError::validation)?;
    let issue = state.repository.create_issue(req, &token).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

pub async fn get_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::extract::Extension(token): axum::extract::Extension<CancellationToken>,
) -> ApiResult<Json<Issue>> {
    let issue = state.repository.get_issue(&id, &token).await?;
    Ok(Json(issue))
}

pub async fn update_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::extract::Extension(token): axum::extract::Extension<CancellationToken>,
    Json(req): Json<UpdateIssueRequest>,
) -> ApiResult<Json<Issue>> {
    req.validate().map_err(ApiError::validation)?;
    let issue = state.repository.update_issue(&id, req, &token).await?;
    Ok(Json(issue))
}

/// `PATCH /issues/{id}/move` intentionally skips status validation — the
/// source handler this mirrors never checked it either, so the `CHECK`
/// constraint on the `issues` table is the only backstop here.
pub async fn move_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::extract::Extension(token): axum::extract::Extension<CancellationToken>,
    Json(req): Json<MoveIssueRequest>,
) -> ApiResult<StatusCode> {
    state.repository.move_issue(&id, req, &token).await?;
    Ok(StatusCode::OK)
}

pub async fn delete_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::extract::Extension(token): axum::extract::Extension<CancellationToken>,
) -> ApiResult<StatusCode> {
    state.repository.delete_issue(&id, &token).await?;
    Ok(StatusCode::NO_CONTENT)
}
