use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Paste {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing)]
    pub delete_key: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_views: Option<i64>,
    pub views: i64,
}
