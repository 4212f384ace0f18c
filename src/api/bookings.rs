//! Booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::booking::{BookingOut, CreateBooking},
};

use super::SharerId;

const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Deserialize)]
pub struct ListParams {
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Deserialize)]
pub struct DecisionParams {
    pub approved: bool,
}

/// Book a time window on an item
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateBooking,
    params(("X-Sharer-User-Id" = i64, Header, description = "Booker user ID")),
    responses(
        (status = 201, description = "Booking created in WAITING status", body = BookingOut),
        (status = 400, description = "Invalid dates or item unavailable"),
        (status = 404, description = "Item or booker not found")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    SharerId(booker_id): SharerId,
    Json(booking): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<BookingOut>)> {
    let created = state.services.bookings.create(booker_id, booking).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Fetch one booking, visible to its booker or the item's owner
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Caller user ID")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingOut),
        (status = 404, description = "Booking not visible to the caller")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    SharerId(caller_id): SharerId,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingOut>> {
    let booking = state.services.bookings.get_booking(caller_id, id).await?;
    Ok(Json(booking))
}

/// List the caller's bookings filtered by state
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Booker user ID"),
        ("state" = Option<String>, Query, description = "ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED"),
        ("from" = Option<i64>, Query, description = "Result offset"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Bookings, newest start first", body = Vec<BookingOut>),
        (status = 400, description = "Unknown state"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_bookings(
    State(state): State<crate::AppState>,
    SharerId(booker_id): SharerId,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<BookingOut>>> {
    let bookings = state
        .services
        .bookings
        .get_user_bookings(
            booker_id,
            params.state.as_deref().unwrap_or("ALL"),
            params.from.unwrap_or(0),
            params.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(bookings))
}

/// List bookings made on the caller's items filtered by state
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Owner user ID"),
        ("state" = Option<String>, Query, description = "ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED"),
        ("from" = Option<i64>, Query, description = "Result offset"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Bookings, newest start first", body = Vec<BookingOut>),
        (status = 400, description = "Unknown state"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_owner_bookings(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<BookingOut>>> {
    let bookings = state
        .services
        .bookings
        .get_owner_bookings(
            owner_id,
            params.state.as_deref().unwrap_or("ALL"),
            params.from.unwrap_or(0),
            params.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(bookings))
}

/// Approve or reject a waiting booking, owner only
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Owner user ID"),
        ("approved" = bool, Query, description = "true to approve, false to reject")
    ),
    responses(
        (status = 200, description = "Decision applied", body = BookingOut),
        (status = 400, description = "Booking already approved"),
        (status = 404, description = "Booking not found or caller not the owner")
    )
)]
pub async fn update_booking_status(
    State(state): State<crate::AppState>,
    SharerId(caller_id): SharerId,
    Path(id): Path<i64>,
    Query(params): Query<DecisionParams>,
) -> AppResult<Json<BookingOut>> {
    let booking = state
        .services
        .bookings
        .update_status(caller_id, id, params.approved)
        .await?;
    Ok(Json(booking))
}
