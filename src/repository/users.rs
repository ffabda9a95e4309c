use tokio_util::sync::CancellationToken;

use super::Repository;
use crate::error::ApiResult;
use crate::models::User;

impl Repository {
    pub async fn list_users(&self, token: &CancellationToken) -> ApiResult<Vec<User>> {
        tokio::select! {
            res = sqlx::query_as("SELECT id, name, avatar_url FROM users ORDER BY name ASC")
                .fetch_all(self.pool()) => Ok(res?),
            _ = token.cancelled() => Err(crate::error::ApiError::internal("request cancelled")),
        }
    }
}
