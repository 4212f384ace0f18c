//! Item listing, search and comment endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::item::{CommentOut, CreateComment, CreateItem, ItemOut, UpdateItem},
};

use super::{validate_body, SharerId};

const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Deserialize)]
pub struct PageParams {
    pub from: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub text: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// List a new item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = CreateItem,
    params(("X-Sharer-User-Id" = i64, Header, description = "Owner user ID")),
    responses(
        (status = 201, description = "Item created", body = ItemOut),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Owner or referenced request not found")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Json(item): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<ItemOut>)> {
    validate_body(&item)?;
    let created = state.services.items.add_item(owner_id, item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update an item, owner only
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Caller user ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = ItemOut),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "Item or caller not found")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    SharerId(caller_id): SharerId,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateItem>,
) -> AppResult<Json<ItemOut>> {
    let updated = state.services.items.update_item(id, caller_id, patch).await?;
    Ok(Json(updated))
}

/// Fetch one item with comments; owners also get the booking summary
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Caller user ID")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemOut),
        (status = 404, description = "Item or caller not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    SharerId(caller_id): SharerId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemOut>> {
    let item = state.services.items.get_by_id(id, caller_id).await?;
    Ok(Json(item))
}

/// List the caller's items with comments and booking summaries
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Owner user ID"),
        ("from" = Option<i64>, Query, description = "Result offset"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Owner's items", body = Vec<ItemOut>)
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Vec<ItemOut>>> {
    let items = state
        .services
        .items
        .get_all_by_owner(
            owner_id,
            page.from.unwrap_or(0),
            page.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(items))
}

/// Search available items by name or description substring
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(
        ("text" = Option<String>, Query, description = "Search text"),
        ("from" = Option<i64>, Query, description = "Result offset"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Matching items", body = Vec<ItemOut>)
    )
)]
pub async fn search_items(
    State(state): State<crate::AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<ItemOut>>> {
    let items = state
        .services
        .items
        .search(
            params.text.as_deref(),
            params.from.unwrap_or(0),
            params.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(items))
}

/// Comment on an item the caller previously rented
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Author user ID")
    ),
    request_body = CreateComment,
    responses(
        (status = 200, description = "Comment created", body = CommentOut),
        (status = 400, description = "Author never rented the item"),
        (status = 404, description = "Item or author not found")
    )
)]
pub async fn add_comment(
    State(state): State<crate::AppState>,
    SharerId(author_id): SharerId,
    Path(id): Path<i64>,
    Json(comment): Json<CreateComment>,
) -> AppResult<Json<CommentOut>> {
    validate_body(&comment)?;
    let created = state.services.items.add_comment(author_id, id, comment).await?;
    Ok(Json(created))
}
