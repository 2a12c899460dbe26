use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a paste submission.
#[derive(Debug, Deserialize)]
pub struct CreatePaste {
    pub content: String,
    pub ttl_seconds: Option<i64>,
    pub max_views: Option<i64>,
}

#[derive(Serialize)]
pub struct CreatedPaste {
    pub id: String,
    pub url: String,
    pub delete_key: String,
}

/// A successful paste access. `expires_at` serializes as RFC 3339.
#[derive(Debug, Clone, Serialize)]
pub struct PasteData {
    pub content: String,
    pub remaining_views: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}
