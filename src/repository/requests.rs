//! Wanted-item requests repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::request::ItemRequest,
};

const REQUEST_COLUMNS: &str = "id, requester_id, description, created";

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<ItemRequest> {
        sqlx::query_as::<_, ItemRequest>(&format!(
            "SELECT {} FROM requests WHERE id = $1",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    /// Check if a request exists
    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM requests WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create a new request, stamped with the given creation time.
    /// Runs in its own transaction.
    pub async fn create(
        &self,
        requester_id: i64,
        description: &str,
        created: DateTime<Utc>,
    ) -> AppResult<ItemRequest> {
        let mut tx = self.pool.begin().await?;
        let request = sqlx::query_as::<_, ItemRequest>(&format!(
            "INSERT INTO requests (requester_id, description, created) \
             VALUES ($1, $2, $3) RETURNING {}",
            REQUEST_COLUMNS
        ))
        .bind(requester_id)
        .bind(description)
        .bind(created)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(request)
    }

    /// All requests authored by one user, oldest first
    pub async fn find_by_requester(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(&format!(
            "SELECT {} FROM requests WHERE requester_id = $1 ORDER BY created",
            REQUEST_COLUMNS
        ))
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Requests authored by anyone but the given user, newest first,
    /// offset/limit paged
    pub async fn find_by_other_users(
        &self,
        user_id: i64,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(&format!(
            "SELECT {} FROM requests WHERE requester_id != $1 \
             ORDER BY created DESC OFFSET $2 LIMIT $3",
            REQUEST_COLUMNS
        ))
        .bind(user_id)
        .bind(from)
        .bind(size)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }
}
