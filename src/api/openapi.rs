//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, health, items, requests, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LendHub API",
        version = "1.0.0",
        description = "Peer-to-peer item sharing REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::create_user,
        users::get_user,
        users::list_users,
        users::update_user,
        users::delete_user,
        // Items
        items::create_item,
        items::update_item,
        items::get_item,
        items::list_items,
        items::search_items,
        items::add_comment,
        // Bookings
        bookings::create_booking,
        bookings::get_booking,
        bookings::get_user_bookings,
        bookings::get_owner_bookings,
        bookings::update_booking_status,
        // Requests
        requests::create_request,
        requests::list_own_requests,
        requests::list_other_requests,
        requests::get_request,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Items
            crate::models::item::ItemOut,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            crate::models::item::CommentOut,
            crate::models::item::CreateComment,
            // Bookings
            crate::models::booking::BookingOut,
            crate::models::booking::BookingShort,
            crate::models::booking::BookingStatus,
            crate::models::booking::CreateBooking,
            // Requests
            crate::models::request::ItemRequestOut,
            crate::models::request::CreateItemRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User account management"),
        (name = "items", description = "Item listings, search and comments"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "requests", description = "Wanted-item requests")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
