//! Items repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::item::Item,
};

const ITEM_COLUMNS: &str = "id, owner_id, name, description, available, request_id";

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items WHERE id = $1",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// Check if an item exists
    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Check if the item belongs to the given owner
    pub async fn is_owned_by(&self, item_id: i64, owner_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM items WHERE id = $1 AND owner_id = $2)",
        )
        .bind(item_id)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Create a new item
    pub async fn create(
        &self,
        owner_id: i64,
        name: &str,
        description: &str,
        available: bool,
        request_id: Option<i64>,
    ) -> AppResult<Item> {
        let created = sqlx::query_as::<_, Item>(&format!(
            "INSERT INTO items (owner_id, name, description, available, request_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ITEM_COLUMNS
        ))
        .bind(owner_id)
        .bind(name)
        .bind(description)
        .bind(available)
        .bind(request_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Save a fully merged item record
    pub async fn update(&self, item: &Item) -> AppResult<Item> {
        let updated = sqlx::query_as::<_, Item>(&format!(
            "UPDATE items SET name = $2, description = $3, available = $4, request_id = $5 \
             WHERE id = $1 RETURNING {}",
            ITEM_COLUMNS
        ))
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .bind(item.request_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    /// List an owner's items, stable id order, offset/limit paged
    pub async fn find_by_owner(&self, owner_id: i64, from: i64, size: i64) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items WHERE owner_id = $1 ORDER BY id OFFSET $2 LIMIT $3",
            ITEM_COLUMNS
        ))
        .bind(owner_id)
        .bind(from)
        .bind(size)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Case-insensitive substring search over name and description,
    /// restricted to available items.
    pub async fn search(&self, text: &str, from: i64, size: i64) -> AppResult<Vec<Item>> {
        let pattern = like_pattern(text);
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items \
             WHERE (name ILIKE $1 OR description ILIKE $1) AND available = TRUE \
             ORDER BY id OFFSET $2 LIMIT $3",
            ITEM_COLUMNS
        ))
        .bind(pattern)
        .bind(from)
        .bind(size)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Items listed to fulfill a single request
    pub async fn find_by_request(&self, request_id: i64) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items WHERE request_id = $1 ORDER BY id",
            ITEM_COLUMNS
        ))
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Items listed to fulfill any of the given requests
    pub async fn find_by_requests(&self, request_ids: &[i64]) -> AppResult<Vec<Item>> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items WHERE request_id = ANY($1) ORDER BY id",
            ITEM_COLUMNS
        ))
        .bind(request_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}

/// Wrap user text in an ILIKE pattern, escaping `%`, `_` and `\` so
/// they match literally instead of acting as wildcards.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_wrapped_in_wildcards() {
        assert_eq!(like_pattern("drill"), "%drill%");
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\tools"), "%c:\\\\tools%");
    }
}
