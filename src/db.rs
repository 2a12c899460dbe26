use chrono::{DateTime, Utc};
use sqlx::AnyPool;

use crate::models::Paste;

#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    /// Connect to a database by URL.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            pool: AnyPool::connect(url).await?,
        })
    }

    /// Create the paste table if it does not exist yet.
    pub async fn migrate(&mut self) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS paste (
                id TEXT PRIMARY KEY,
                content TEXT NOT NULL,
                delete_key TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL,
                expires_at TIMESTAMP,
                max_views BIGINT,
                views BIGINT NOT NULL DEFAULT 0
            )",
        )
        .execute(&mut conn)
        .await?;
        Ok(())
    }

    /// Get all pastes.
    pub async fn get_all_pastes(&mut self) -> crate::ApiResult<Vec<Paste>> {
        let mut conn = self.pool.acquire().await?;
        Ok(sqlx::query_as::<_, Paste>(
            "SELECT id, content, delete_key, created_at, expires_at, max_views, views FROM paste",
        )
        .fetch_all(&mut conn)
        .await?)
    }

    /// Get a paste by id.
    pub async fn get_paste(&mut self, id: &str) -> crate::ApiResult<Paste> {
        let mut conn = self.pool.acquire().await?;
        let paste = sqlx::query_as::<_, Paste>(
            "SELECT id, content, delete_key, created_at, expires_at, max_views, views FROM paste \
             WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&mut conn)
        .await?;
        Ok(paste)
    }

    /// Insert a paste with zero views.
    pub async fn insert_paste(
        &mut self,
        id: &str,
        delete_key: &str,
        content: &str,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        max_views: Option<i64>,
    ) -> crate::ApiResult<Paste> {
        let mut conn = self.pool.acquire().await?;
        let paste = sqlx::query_as::<_, Paste>(
            "INSERT INTO paste (id, content, delete_key, created_at, expires_at, max_views, \
             views) VALUES (?, ?, ?, ?, ?, ?, 0) RETURNING id, content, delete_key, created_at, \
             expires_at, max_views, views",
        )
        .bind(id)
        .bind(content)
        .bind(delete_key)
        .bind(created_at)
        .bind(expires_at)
        .bind(max_views)
        .fetch_one(&mut conn)
        .await?;
        Ok(paste)
    }

    /// Delete a paste by id. Deleting a missing id is not an error.
    pub async fn delete_paste(&mut self, id: &str) -> crate::ApiResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("DELETE FROM paste WHERE id = ?")
            .bind(id)
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    /// Bump the view counter and return the updated row. The increment is a
    /// single statement, so two racing accessors can never read the same
    /// pre-increment count.
    pub async fn increment_views(&mut self, id: &str) -> crate::ApiResult<Paste> {
        let mut conn = self.pool.acquire().await?;
        let paste = sqlx::query_as::<_, Paste>(
            "UPDATE paste SET views = views + 1 WHERE id = ? RETURNING id, content, delete_key, \
             created_at, expires_at, max_views, views",
        )
        .bind(id)
        .fetch_one(&mut conn)
        .await?;
        Ok(paste)
    }

    /// Check that the store still answers queries.
    pub async fn ping(&mut self) -> crate::ApiResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
impl Database {
    /// Fresh in-memory database. Capped at a single connection so every
    /// acquire sees the same sqlite instance.
    pub async fn in_memory() -> Self {
        use sqlx::any::AnyPoolOptions;

        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory database");

        let mut db = Database { pool };
        db.migrate().await.expect("failed to migrate in-memory database");
        db
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::ApiError;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let mut db = Database::in_memory().await;
        db.insert_paste("abcd1234", "key", "hello", at(0), Some(at(60)), Some(3))
            .await
            .unwrap();

        let paste = db.get_paste("abcd1234").await.unwrap();
        assert_eq!(paste.content, "hello");
        assert_eq!(paste.created_at, at(0));
        assert_eq!(paste.expires_at, Some(at(60)));
        assert_eq!(paste.max_views, Some(3));
        assert_eq!(paste.views, 0);
    }

    #[tokio::test]
    async fn missing_paste_maps_to_not_found() {
        let mut db = Database::in_memory().await;
        assert!(matches!(
            db.get_paste("missing").await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn increment_returns_each_updated_count() {
        let mut db = Database::in_memory().await;
        db.insert_paste("abcd1234", "key", "hello", at(0), None, None)
            .await
            .unwrap();

        assert_eq!(db.increment_views("abcd1234").await.unwrap().views, 1);
        assert_eq!(db.increment_views("abcd1234").await.unwrap().views, 2);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let mut db = Database::in_memory().await;
        db.delete_paste("never-existed").await.unwrap();
        db.delete_paste("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn ping_answers() {
        let mut db = Database::in_memory().await;
        db.ping().await.unwrap();
    }
}
