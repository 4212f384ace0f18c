//! Wanted-item request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::request::{CreateItemRequest, ItemRequestOut},
};

use super::{validate_body, SharerId};

const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Deserialize)]
pub struct PageParams {
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// Post a wanted-item request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = CreateItemRequest,
    params(("X-Sharer-User-Id" = i64, Header, description = "Requester user ID")),
    responses(
        (status = 201, description = "Request created", body = ItemRequestOut),
        (status = 400, description = "Invalid description"),
        (status = 404, description = "Requester not found")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    SharerId(requester_id): SharerId,
    Json(request): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ItemRequestOut>)> {
    validate_body(&request)?;
    let created = state.services.requests.create(requester_id, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the caller's own requests with their fulfilling items
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(("X-Sharer-User-Id" = i64, Header, description = "Requester user ID")),
    responses(
        (status = 200, description = "Caller's requests", body = Vec<ItemRequestOut>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_own_requests(
    State(state): State<crate::AppState>,
    SharerId(requester_id): SharerId,
) -> AppResult<Json<Vec<ItemRequestOut>>> {
    let requests = state.services.requests.find_all_by_user(requester_id).await?;
    Ok(Json(requests))
}

/// List other users' requests, newest first
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Caller user ID"),
        ("from" = Option<i64>, Query, description = "Result offset"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Other users' requests", body = Vec<ItemRequestOut>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_other_requests(
    State(state): State<crate::AppState>,
    SharerId(caller_id): SharerId,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Vec<ItemRequestOut>>> {
    let requests = state
        .services
        .requests
        .find_all_by_other_users(
            caller_id,
            page.from.unwrap_or(0),
            page.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(requests))
}

/// Fetch one request with its fulfilling items
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i64, Path, description = "Request ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Caller user ID")
    ),
    responses(
        (status = 200, description = "Request details", body = ItemRequestOut),
        (status = 404, description = "Request or caller not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    SharerId(caller_id): SharerId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemRequestOut>> {
    let request = state.services.requests.find_by_id(caller_id, id).await?;
    Ok(Json(request))
}
