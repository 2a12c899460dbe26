use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::id::generate_id;
use crate::models::Paste;
use crate::policy::{self, Access};
use crate::types::api::PasteData;
use crate::{ApiError, App};

/// Validate a submission and persist a new paste.
///
/// Content is stored trimmed. `now` is the creation instant; time-based
/// expiry is computed from it, so tests can pin the clock.
pub async fn create(
    app: &mut App,
    content: &str,
    ttl_seconds: Option<i64>,
    max_views: Option<i64>,
    now: DateTime<Utc>,
) -> crate::ApiResult<Paste> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation {
            reason: "content must not be empty".to_owned(),
        });
    }
    if ttl_seconds.is_some_and(|ttl| ttl < 1) {
        return Err(ApiError::Validation {
            reason: "ttl_seconds must be a positive integer".to_owned(),
        });
    }
    if max_views.is_some_and(|max| max < 1) {
        return Err(ApiError::Validation {
            reason: "max_views must be a positive integer".to_owned(),
        });
    }

    let id = generate_id();
    let delete_key = Uuid::new_v4().to_string();
    let expires_at = ttl_seconds.map(|ttl| now + Duration::seconds(ttl));

    info!(
        "new paste: id='{id}', ttl={ttl_seconds:?}, max_views={max_views:?}, size={size}",
        size = content.len()
    );

    let paste = app
        .database
        .insert_paste(&id, &delete_key, content, now, expires_at, max_views)
        .await?;

    Ok(paste)
}

/// Serve one view of a paste at instant `now`.
///
/// A paste past its expiry instant is deleted before the caller sees the
/// not-found, so no later access can observe it. A view-exhausted paste is
/// removed the same way. Whether the id never existed or the paste just
/// expired is not distinguishable from the outside.
pub async fn access(app: &mut App, id: &str, now: DateTime<Utc>) -> crate::ApiResult<PasteData> {
    let paste = app.database.get_paste(id).await?;

    match policy::evaluate(&paste, now) {
        Access::ExpiredByTime => {
            info!("deleting expired paste: {id}");
            app.database.delete_paste(id).await?;
            Err(ApiError::NotFound)
        }
        Access::ExpiredByViews => {
            info!("deleting view-exhausted paste: {id}");
            app.database.delete_paste(id).await?;
            Err(ApiError::NotFound)
        }
        Access::Alive => {
            let paste = app.database.increment_views(id).await?;
            Ok(PasteData {
                content: paste.content,
                remaining_views: paste.max_views.map(|max| max - paste.views),
                expires_at: paste.expires_at,
            })
        }
    }
}

/// Delete a paste, provided the caller holds its delete key.
pub async fn delete(app: &mut App, id: &str, delete_key: &str) -> crate::ApiResult<()> {
    let paste = app.database.get_paste(id).await?;

    if delete_key != paste.delete_key {
        return Err(ApiError::WrongDeleteKey);
    }

    app.database.delete_paste(id).await?;
    Ok(())
}

/// Delete every paste the policy no longer reports alive at `now`.
pub async fn purge_expired(app: &mut App, now: DateTime<Utc>) -> crate::ApiResult<()> {
    let pastes = app.database.get_all_pastes().await?;

    let mut count = 0;
    for paste in pastes {
        if policy::evaluate(&paste, now) != Access::Alive {
            info!(
                "purging paste: id='{}', created_at={}",
                paste.id, paste.created_at
            );
            app.database.delete_paste(&paste.id).await?;
            count += 1;
        }
    }

    if count > 0 {
        info!("deleted {count} pastes");
    }

    Ok(())
}
