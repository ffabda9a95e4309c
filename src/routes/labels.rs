use axum::extract::{Extension, State};
use axum::Json;
use tokio_util::sync::CancellationToken;

use crate::error::ApiResult;
use crate::models::Label;
use crate::AppState;

pub async fn list_labels(
    State(state): State<AppState>,
    Extension(token): Extension<CancellationToken>,
) -> ApiResult<Json<Vec<Label>>> {
    let labels = state.repository.list_labels(&token).await?;
    Ok(Json(labels))
}
