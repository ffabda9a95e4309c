use axum::extract::{Extension, State};
use axum::Json;
use tokio_util::sync::CancellationToken;

use crate::error::ApiResult;
use crate::models::User;
use crate::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    Extension(token): Extension<CancellationToken>,
) -> ApiResult<Json<Vec<User>>> {
    let users = state.repository.list_users(&token).await?;
    Ok(Json(users))
}
