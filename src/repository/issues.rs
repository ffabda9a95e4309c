//! Issue queries: dynamic filtering with pagination, batch label hydration,
//! and the create/update/move/delete lifecycle.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::Repository;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateIssueRequest, Issue, IssueListQuery, IssueRow, Label, MoveIssueRequest,
    UpdateIssueRequest,
};

const ISSUE_ROW_COLUMNS: &str = "
    i.id, i.title, i.description, i.status, i.priority, i.assignee_id,
    i.order_index, i.created_at, i.updated_at,
    u.name AS assignee_name, u.avatar_url AS assignee_avatar_url";

impl Repository {
    /// Runs a future to completion unless `token` fires first, in which
    /// case the client disconnected or the server is shutting down and
    /// the in-flight store call is abandoned.
    async fn run<T>(
        &self,
        token: &CancellationToken,
        fut: impl std::future::Future<Output = Result<T, sqlx::Error>>,
    ) -> ApiResult<T> {
        tokio::select! {
            res = fut => Ok(res?),
            _ = token.cancelled() => Err(ApiError::internal("request cancelled")),
        }
    }

    /// Returns issues matching the AND of every supplied filter, with
    /// assignee and labels hydrated. Ordered `order_index ASC, id ASC`.
    pub async fn list_issues(
        &self,
        filter: &IssueListQuery,
        token: &CancellationToken,
    ) -> ApiResult<Vec<Issue>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {ISSUE_ROW_COLUMNS} FROM issues i LEFT JOIN users u ON u.id = i.assignee_id WHERE 1=1"
        ));

        if !filter.status.is_empty() {
            qb.push(" AND i.status IN (");
            push_in_list(&mut qb, &filter.status);
            qb.push(")");
        }

        if !filter.priority.is_empty() {
            qb.push(" AND i.priority IN (");
            push_in_list(&mut qb, &filter.priority);
            qb.push(")");
        }

        if let Some(assignee) = &filter.assignee {
            qb.push(" AND i.assignee_id = ");
            qb.push_bind(assignee.clone());
        }

        if !filter.labels.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM issue_labels il JOIN labels l ON l.id = il.label_id \
                  WHERE il.issue_id = i.id AND l.name IN (",
            );
            push_in_list(&mut qb, &filter.labels);
            qb.push("))");
        }

        qb.push(" ORDER BY i.order_index ASC, i.id ASC");

        let page: i64 = filter
            .page
            .as_deref()
            .and_then(|p| p.parse().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let page_size: i64 = filter
            .page_size
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or(0);

        if page_size > 0 {
            qb.push(" LIMIT ");
            qb.push_bind(page_size);
            qb.push(" OFFSET ");
            qb.push_bind((page - 1) * page_size);
        }

        let rows: Vec<IssueRow> = self
            .run(token, qb.build_query_as().fetch_all(self.pool()))
            .await?;

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        let mut labels_by_issue = self.labels_for_issues(&ids, token).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let labels = labels_by_issue.remove(&row.id).unwrap_or_default();
                row.into_issue(labels)
            })
            .collect())
    }

    /// Single batch query keyed by the id set, avoiding one query per issue.
    async fn labels_for_issues(
        &self,
        issue_ids: &[&str],
        token: &CancellationToken,
    ) -> ApiResult<HashMap<String, Vec<Label>>> {
        let mut by_issue: HashMap<String, Vec<Label>> = HashMap::new();
        if issue_ids.is_empty() {
            return Ok(by_issue);
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT il.issue_id, l.id, l.name, l.color \
             FROM issue_labels il JOIN labels l ON l.id = il.label_id \
             WHERE il.issue_id IN (",
        );
        push_in_list(&mut qb, issue_ids);
        qb.push(")");

        let rows: Vec<(String, String, String, String)> = self
            .run(token, qb.build_query_as().fetch_all(self.pool()))
            .await?;

        for (issue_id, id, name, color) in rows {
            by_issue
                .entry(issue_id)
                .or_default()
                .push(Label { id, name, color });
        }

        Ok(by_issue)
    }

    pub async fn get_issue(&self, id: &str, token: &CancellationToken) -> ApiResult<Issue> {
        let row: IssueRow = self
            .run(
                token,
                sqlx::query_as(&format!(
                    "SELECT {ISSUE_ROW_COLUMNS} FROM issues i \
                     LEFT JOIN users u ON u.id = i.assignee_id WHERE i.id = ?"
                ))
                .bind(id)
                .fetch_one(self.pool()),
            )
            .await?;

        let labels = self
            .labels_for_issues(&[id], token)
            .await?
            .remove(id)
            .unwrap_or_default();

        Ok(row.into_issue(labels))
    }

    /// Creates the issue at the top of its target column (`min(order_index) - 1`,
    /// or `0` if the column is empty) and persists its label set, both
    /// inside one transaction — a dangling label id rolls back the insert
    /// too, instead of leaving an unlabeled issue behind.
    pub async fn create_issue(
        &self,
        req: CreateIssueRequest,
        token: &CancellationToken,
    ) -> ApiResult<Issue> {
        let id = Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let labels: HashSet<&String> = req.label_ids.iter().collect();

        let fut = async {
            let mut tx = self.pool().begin().await?;

            let min_order: Option<f64> =
                sqlx::query_scalar("SELECT MIN(order_index) FROM issues WHERE status = ?")
                    .bind(&req.status)
                    .fetch_one(&mut *tx)
                    .await?;
            let order_index = min_order.map(|m| m - 1.0).unwrap_or(0.0);

            sqlx::query(
                "INSERT INTO issues (id, title, description, status, priority, assignee_id, \
                 order_index, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(&req.title)
            .bind(&req.description)
            .bind(&req.status)
            .bind(&req.priority)
            .bind(&req.assignee_id)
            .bind(order_index)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            for label_id in &labels {
                sqlx::query("INSERT INTO issue_labels (issue_id, label_id) VALUES (?, ?)")
                    .bind(&id)
                    .bind(*label_id)
                    .execute(&mut *tx)
                    .await?;
            }

            tx.commit().await
        };

        self.run(token, fut).await?;

        self.get_issue(&id, token).await
    }

    /// Applies only the fields explicitly present in `req`. `assignee_id`
    /// uses `Option<Option<String>>` so an explicit `null` clears it while
    /// an absent key leaves the current assignee untouched.
    pub async fn update_issue(
        &self,
        id: &str,
        req: UpdateIssueRequest,
        token: &CancellationToken,
    ) -> ApiResult<Issue> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE issues SET ");
        let mut first = true;

        macro_rules! set_field {
            ($col:literal, $val:expr) => {{
                if !first {
                    qb.push(", ");
                }
                first = false;
                qb.push(concat!($col, " = "));
                qb.push_bind($val);
            }};
        }

        if let Some(title) = &req.title {
            set_field!("title", title.clone());
        }
        if let Some(description) = &req.description {
            set_field!("description", description.clone());
        }
        if let Some(status) = &req.status {
            set_field!("status", status.clone());
        }
        if let Some(priority) = &req.priority {
            set_field!("priority", priority.clone());
        }
        if let Some(assignee_id) = &req.assignee_id {
            set_field!("assignee_id", assignee_id.clone());
        }

        if !first {
            qb.push(", ");
        }
        qb.push("updated_at = ");
        qb.push_bind(Utc::now());

        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let result = self.run(token, qb.build().execute(self.pool())).await?;
        if result.rows_affected() == 0 {
            // A missing id here surfaces as a generic 500 rather than 404,
            // unlike `get_issue`: the row-count check can't distinguish
            // "no such id" from any other reason zero rows were touched.
            return Err(ApiError::internal("update affected no rows"));
        }

        if let Some(label_ids) = &req.label_ids {
            self.replace_issue_labels(id, label_ids, token).await?;
        }

        self.get_issue(id, token).await
    }

    /// Applies the requested status/order_index atomically and touches
    /// `updated_at`. This is the hot path for drag-and-drop, so it never
    /// re-fetches the hydrated issue.
    pub async fn move_issue(
        &self,
        id: &str,
        req: MoveIssueRequest,
        token: &CancellationToken,
    ) -> ApiResult<()> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE issues SET updated_at = ");
        qb.push_bind(Utc::now());

        if let Some(status) = &req.status {
            qb.push(", status = ");
            qb.push_bind(status.clone());
        }
        if let Some(order_index) = req.order_index {
            qb.push(", order_index = ");
            qb.push_bind(order_index);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let result = self.run(token, qb.build().execute(self.pool())).await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::internal("move affected no rows"));
        }
        Ok(())
    }

    pub async fn delete_issue(&self, id: &str, token: &CancellationToken) -> ApiResult<()> {
        let result = self
            .run(
                token,
                sqlx::query("DELETE FROM issues WHERE id = ?")
                    .bind(id)
                    .execute(self.pool()),
            )
            .await?;
        if result.rows_affected() == 0 {
            // Same asymmetry as `update_issue`: deleting an unknown id
            // surfaces as 500, not 404.
            return Err(ApiError::internal("delete affected no rows"));
        }
        Ok(())
    }

    /// Replaces an issue's label set inside one transaction: delete then
    /// insert, committed or rolled back as a unit. A set operation — the
    /// input is collapsed to its unique label ids before the re-insert, so
    /// a caller passing duplicates doesn't trip the edge table's
    /// `(issue_id, label_id)` primary key.
    async fn replace_issue_labels(
        &self,
        issue_id: &str,
        label_ids: &[String],
        token: &CancellationToken,
    ) -> ApiResult<()> {
        let unique: HashSet<&String> = label_ids.iter().collect();

        let fut = async {
            let mut tx = self.pool().begin().await?;

            sqlx::query("DELETE FROM issue_labels WHERE issue_id = ?")
                .bind(issue_id)
                .execute(&mut *tx)
                .await?;

            for label_id in &unique {
                sqlx::query("INSERT INTO issue_labels (issue_id, label_id) VALUES (?, ?)")
                    .bind(issue_id)
                    .bind(*label_id)
                    .execute(&mut *tx)
                    .await?;
            }

            tx.commit().await
        };

        self.run(token, fut).await
    }
}

/// Pushes a comma-separated list of bound placeholders, e.g. `?, ?, ?`.
fn push_in_list<T>(qb: &mut QueryBuilder<'_, Sqlite>, values: &[T])
where
    T: AsRef<str>,
{
    let mut separated = qb.separated(", ");
    for value in values {
        separated.push_bind(value.as_ref().to_string());
    }
}
