//! Comments repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::item::CommentRow};

const COMMENT_SELECT: &str = "SELECT c.id, c.item_id, c.text, u.name AS author_name, c.created \
                              FROM comments c \
                              JOIN users u ON c.author_id = u.id";

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a new comment, stamped with the given creation time
    pub async fn create(
        &self,
        item_id: i64,
        author_id: i64,
        text: &str,
        created: DateTime<Utc>,
    ) -> AppResult<CommentRow> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO comments (item_id, author_id, text, created) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(item_id)
        .bind(author_id)
        .bind(text)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;

        let comment = sqlx::query_as::<_, CommentRow>(&format!("{} WHERE c.id = $1", COMMENT_SELECT))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(comment)
    }

    /// Comments of one item, newest first, with author names joined in
    pub async fn find_by_item(&self, item_id: i64) -> AppResult<Vec<CommentRow>> {
        let comments = sqlx::query_as::<_, CommentRow>(&format!(
            "{} WHERE c.item_id = $1 ORDER BY c.created DESC",
            COMMENT_SELECT
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    /// Comments across a set of items, newest first
    pub async fn find_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<CommentRow>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let comments = sqlx::query_as::<_, CommentRow>(&format!(
            "{} WHERE c.item_id = ANY($1) ORDER BY c.created DESC",
            COMMENT_SELECT
        ))
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }
}
