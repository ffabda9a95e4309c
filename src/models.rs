use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================
// ENUMS
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Backlog,
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
    Canceled,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Backlog,
        Status::Todo,
        Status::InProgress,
        Status::Done,
        Status::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Backlog => "Backlog",
            Status::Todo => "Todo",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
            Status::Canceled => "Canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// ENTITIES
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Label {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// An issue as returned to clients: foreign keys are hydrated into the
/// rows they reference rather than left as bare ids.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub assignee: Option<User>,
    pub labels: Vec<Label>,
    pub order_index: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The raw `issues` row plus the left-joined assignee columns, before
/// label hydration is spliced on. `sqlx::FromRow` maps one query's
/// projection onto this; labels are always populated after the fact.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IssueRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub assignee_id: Option<String>,
    pub order_index: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assignee_name: Option<String>,
    pub assignee_avatar_url: Option<String>,
}

impl IssueRow {
    pub fn into_issue(self, labels: Vec<Label>) -> Issue {
        let assignee = match (self.assignee_id, self.assignee_name) {
            (Some(id), Some(name)) => Some(User {
                id,
                name,
                avatar_url: self.assignee_avatar_url,
            }),
            _ => None,
        };

        Issue {
            id: self.id,
            title: self.title,
            description: self.description,
            status: Status::parse(&self.status).unwrap_or(Status::Backlog),
            priority: Priority::parse(&self.priority).unwrap_or(Priority::Low),
            assignee,
            labels,
            order_index: self.order_index,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// ============================================
// REQUEST / RESPONSE SHAPES
// ============================================

#[derive(Debug, Deserialize)]
pub struct CreateIssueRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    pub priority: String,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub label_ids: Vec<String>,
}

/// A partial update. Every field is an `Option` so the handler can tell
/// "absent" (leave alone) apart from "present" (apply, even if null).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateIssueRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// `None` at the Rust level means "key absent"; `Some(None)` means
    /// "key present with value null" (clear the assignee). Serde's blanket
    /// `Option<T>` impl collapses both cases to `None` on its own, so the
    /// field needs its own deserializer to tell them apart.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_some"
    )]
    pub assignee_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_ids: Option<Vec<String>>,
}

/// Deserializes a present field (including an explicit `null`) as `Some`,
/// so it stays distinguishable from the field being absent entirely.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct MoveIssueRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub order_index: Option<f64>,
}

/// Parsed from the raw query string rather than derived `Deserialize`,
/// since repeated keys (`status=Todo&status=Done`) and comma-separated
/// values within one key both need to collapse into the same `Vec`.
#[derive(Debug, Default)]
pub struct IssueListQuery {
    pub status: Vec<String>,
    pub assignee: Option<String>,
    pub priority: Vec<String>,
    pub labels: Vec<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl IssueListQuery {
    pub fn from_raw(raw: &str) -> Self {
        let mut query = IssueListQuery::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let values = value.split(',').map(|s| s.to_string());
            match key.as_ref() {
                "status" => query.status.extend(values),
                "priority" => query.priority.extend(values),
                "labels" => query.labels.extend(values),
                "assignee" => query.assignee = Some(value.into_owned()),
                "page" => query.page = Some(value.into_owned()),
                "page_size" => query.page_size = Some(value.into_owned()),
                _ => {}
            }
        }
        query
    }
}
