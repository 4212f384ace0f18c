//! Wanted-item request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::item::ItemOut;

/// Wanted-item request record as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct ItemRequest {
    pub id: i64,
    pub requester_id: i64,
    pub description: String,
    pub created: DateTime<Utc>,
}

/// Request representation for responses, enriched with the items that
/// were listed to fulfill it. The item list is never stored; it is
/// joined on `items.request_id` at read time.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemRequestOut {
    pub id: i64,
    pub description: String,
    pub created: DateTime<Utc>,
    pub items: Vec<ItemOut>,
}

impl ItemRequestOut {
    pub fn new(request: ItemRequest, items: Vec<ItemOut>) -> Self {
        Self {
            id: request.id,
            description: request.description,
            created: request.created,
            items,
        }
    }
}

/// Create request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 200, message = "description must be 1 to 200 characters"))]
    pub description: String,
}
