//! Item model, comments and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::booking::BookingShort;

/// Item record as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct Item {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

/// Item representation for responses, enriched with comments and, for the
/// owner, the last/next booking summary.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemOut {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
    pub last_booking: Option<BookingShort>,
    pub next_booking: Option<BookingShort>,
    pub comments: Vec<CommentOut>,
}

impl From<Item> for ItemOut {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id,
            last_booking: None,
            next_booking: None,
            comments: Vec::new(),
        }
    }
}

/// Create item request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    #[validate(length(min = 1, message = "name must not be blank"))]
    pub name: String,
    #[validate(length(min = 1, message = "description must not be blank"))]
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

/// Partial update request body. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub request_id: Option<i64>,
}

impl UpdateItem {
    /// Merge this patch onto an existing record, filling omitted fields
    /// from the stored value.
    pub fn merge_into(self, existing: Item) -> Item {
        Item {
            id: existing.id,
            owner_id: existing.owner_id,
            name: self.name.unwrap_or(existing.name),
            description: self.description.unwrap_or(existing.description),
            available: self.available.unwrap_or(existing.available),
            request_id: self.request_id.or(existing.request_id),
        }
    }
}

/// Comment with the author's display name, as stored plus one join
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub item_id: i64,
    pub text: String,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

/// Comment representation for responses
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentOut {
    pub id: i64,
    pub text: String,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

impl From<CommentRow> for CommentOut {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            author_name: row.author_name,
            created: row.created,
        }
    }
}

/// Create comment request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(length(min = 1, message = "text must not be blank"))]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Item {
        Item {
            id: 3,
            owner_id: 1,
            name: "Drill".to_string(),
            description: "Cordless drill".to_string(),
            available: true,
            request_id: None,
        }
    }

    #[test]
    fn merge_keeps_omitted_fields() {
        let patch = UpdateItem {
            available: Some(false),
            ..Default::default()
        };
        let merged = patch.merge_into(stored());
        assert_eq!(merged.name, "Drill");
        assert_eq!(merged.description, "Cordless drill");
        assert!(!merged.available);
        assert_eq!(merged.owner_id, 1);
    }

    #[test]
    fn merge_replaces_supplied_fields() {
        let patch = UpdateItem {
            name: Some("Hammer drill".to_string()),
            description: Some("SDS+".to_string()),
            available: Some(true),
            request_id: Some(9),
        };
        let merged = patch.merge_into(stored());
        assert_eq!(merged.name, "Hammer drill");
        assert_eq!(merged.description, "SDS+");
        assert_eq!(merged.request_id, Some(9));
    }
}
