use tokio_util::sync::CancellationToken;

use super::Repository;
use crate::error::ApiResult;
use crate::models::Label;

impl Repository {
    pub async fn list_labels(&self, token: &CancellationToken) -> ApiResult<Vec<Label>> {
        tokio::select! {
            res = sqlx::query_as("SELECT id, name, color FROM labels ORDER BY name ASC")
                .fetch_all(self.pool()) => Ok(res?),
            _ = token.cancelled() => Err(crate::error::ApiError::internal("request cancelled")),
        }
    }
}
