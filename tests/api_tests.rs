//! API integration tests
//!
//! These drive a running server; start one locally and run with:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:9090";
const SHARER_HEADER: &str = "X-Sharer-User-Id";

/// Create a user with a unique email and return its id
async fn create_user(client: &Client, name: &str) -> i64 {
    let email = format!(
        "{}-{}@lendhub.test",
        name.to_lowercase(),
        chrono_nanos()
    );
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": name, "email": email }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse user");
    body["id"].as_i64().expect("No user ID")
}

fn chrono_nanos() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos() as i64
        + std::process::id() as i64 * 1_000_000_000
}

async fn create_item(client: &Client, owner_id: i64, name: &str, available: bool) -> i64 {
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(SHARER_HEADER, owner_id)
        .json(&json!({
            "name": name,
            "description": format!("{} for sharing", name),
            "available": available
        }))
        .send()
        .await
        .expect("Failed to create item");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse item");
    body["id"].as_i64().expect("No item ID")
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_user_round_trip_and_patch_merge() {
    let client = Client::new();
    let user_id = create_user(&client, "Trip").await;

    // create then get returns the same record plus the assigned id
    let fetched: Value = client
        .get(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to fetch user")
        .json()
        .await
        .expect("Failed to parse user");
    assert_eq!(fetched["id"].as_i64(), Some(user_id));
    assert_eq!(fetched["name"], "Trip");

    // patching only the name keeps the email
    let email_before = fetched["email"].clone();
    let patched: Value = client
        .patch(format!("{}/users/{}", BASE_URL, user_id))
        .json(&json!({ "name": "Tripp" }))
        .send()
        .await
        .expect("Failed to patch user")
        .json()
        .await
        .expect("Failed to parse user");
    assert_eq!(patched["name"], "Tripp");
    assert_eq!(patched["email"], email_before);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_conflict() {
    let client = Client::new();
    let email = format!("dup-{}@lendhub.test", chrono_nanos());

    let first = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": "First", "email": email }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(first.status(), 201);

    let second = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": "Second", "email": email }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(second.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_search_with_empty_text_returns_empty_list() {
    let client = Client::new();

    let response = client
        .get(format!("{}/items/search?text=", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_search_excludes_unavailable_items() {
    let client = Client::new();
    let owner = create_user(&client, "Seller").await;
    let token = format!("periscope{}", chrono_nanos());

    // both names match the query, but only the available item may show up
    let shown = create_item(&client, owner, &format!("{} deluxe", token), true).await;
    let hidden = create_item(&client, owner, &format!("{} broken", token), false).await;

    let body: Value = client
        .get(format!("{}/items/search?text={}", BASE_URL, token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let ids: Vec<i64> = body
        .as_array()
        .expect("Expected an array")
        .iter()
        .filter_map(|item| item["id"].as_i64())
        .collect();
    assert!(ids.contains(&shown));
    assert!(!ids.contains(&hidden));
}

#[tokio::test]
#[ignore]
async fn test_patch_email_to_existing_address_conflicts() {
    let client = Client::new();
    let taken = format!("taken-{}@lendhub.test", chrono_nanos());

    let first = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": "Keeper", "email": taken }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(first.status(), 201);

    let other = create_user(&client, "Mover").await;
    let response = client
        .patch(format!("{}/users/{}", BASE_URL, other))
        .json(&json!({ "email": taken }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_booking_with_reversed_dates_is_rejected() {
    let client = Client::new();
    let owner = create_user(&client, "Owner").await;
    let booker = create_user(&client, "Booker").await;
    let item = create_item(&client, owner, "Ladder", true).await;

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(SHARER_HEADER, booker)
        .json(&json!({
            "itemId": item,
            "start": "2030-01-02T10:00:00Z",
            "end": "2030-01-01T10:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_approval_is_terminal() {
    let client = Client::new();
    let owner = create_user(&client, "Anna").await;
    let booker = create_user(&client, "Boris").await;
    let item = create_item(&client, owner, "Drill", true).await;

    // booker books a future window; booking starts out WAITING
    let booking: Value = client
        .post(format!("{}/bookings", BASE_URL))
        .header(SHARER_HEADER, booker)
        .json(&json!({
            "itemId": item,
            "start": "2030-06-01T10:00:00Z",
            "end": "2030-06-01T12:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to create booking")
        .json()
        .await
        .expect("Failed to parse booking");
    assert_eq!(booking["status"], "WAITING");
    let booking_id = booking["id"].as_i64().expect("No booking ID");

    // owner approves
    let approved: Value = client
        .patch(format!(
            "{}/bookings/{}?approved=true",
            BASE_URL, booking_id
        ))
        .header(SHARER_HEADER, owner)
        .send()
        .await
        .expect("Failed to approve booking")
        .json()
        .await
        .expect("Failed to parse booking");
    assert_eq!(approved["status"], "APPROVED");

    // a second decision on an approved booking is refused
    let response = client
        .patch(format!(
            "{}/bookings/{}?approved=false",
            BASE_URL, booking_id
        ))
        .header(SHARER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_rejected_booking_can_be_decided_again() {
    let client = Client::new();
    let owner = create_user(&client, "Astrid").await;
    let booker = create_user(&client, "Bjorn").await;
    let item = create_item(&client, owner, "Sander", true).await;

    let booking: Value = client
        .post(format!("{}/bookings", BASE_URL))
        .header(SHARER_HEADER, booker)
        .json(&json!({
            "itemId": item,
            "start": "2030-06-01T10:00:00Z",
            "end": "2030-06-01T12:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to create booking")
        .json()
        .await
        .expect("Failed to parse booking");
    let booking_id = booking["id"].as_i64().expect("No booking ID");

    // owner rejects first
    let rejected: Value = client
        .patch(format!(
            "{}/bookings/{}?approved=false",
            BASE_URL, booking_id
        ))
        .header(SHARER_HEADER, owner)
        .send()
        .await
        .expect("Failed to reject booking")
        .json()
        .await
        .expect("Failed to parse booking");
    assert_eq!(rejected["status"], "REJECTED");

    // rejection is not final; the owner may change their mind
    let response = client
        .patch(format!(
            "{}/bookings/{}?approved=true",
            BASE_URL, booking_id
        ))
        .header(SHARER_HEADER, owner)
        .send()
        .await
        .expect("Failed to approve booking");
    assert_eq!(response.status(), 200);

    let approved: Value = response.json().await.expect("Failed to parse booking");
    assert_eq!(approved["status"], "APPROVED");
}

#[tokio::test]
#[ignore]
async fn test_self_booking_is_not_found() {
    let client = Client::new();
    let owner = create_user(&client, "Solo").await;
    let item = create_item(&client, owner, "Tent", true).await;

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(SHARER_HEADER, owner)
        .json(&json!({
            "itemId": item,
            "start": "2030-06-01T10:00:00Z",
            "end": "2030-06-01T12:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_request_is_enriched_with_fulfilling_item() {
    let client = Client::new();
    let requester = create_user(&client, "Rita").await;
    let owner = create_user(&client, "Omar").await;

    let request: Value = client
        .post(format!("{}/requests", BASE_URL))
        .header(SHARER_HEADER, requester)
        .json(&json!({ "description": "Need a drill" }))
        .send()
        .await
        .expect("Failed to create request")
        .json()
        .await
        .expect("Failed to parse request");
    let request_id = request["id"].as_i64().expect("No request ID");
    assert_eq!(request["items"].as_array().map(Vec::len), Some(0));

    // owner lists an item against the request
    let item: Value = client
        .post(format!("{}/items", BASE_URL))
        .header(SHARER_HEADER, owner)
        .json(&json!({
            "name": "Drill",
            "description": "Cordless drill",
            "available": true,
            "requestId": request_id
        }))
        .send()
        .await
        .expect("Failed to create item")
        .json()
        .await
        .expect("Failed to parse item");
    let item_id = item["id"].as_i64().expect("No item ID");

    let own: Value = client
        .get(format!("{}/requests", BASE_URL))
        .header(SHARER_HEADER, requester)
        .send()
        .await
        .expect("Failed to list requests")
        .json()
        .await
        .expect("Failed to parse requests");
    let found = own
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["id"].as_i64() == Some(request_id))
        .expect("Request missing from own list");
    let items = found["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64(), Some(item_id));
}

#[tokio::test]
#[ignore]
async fn test_comment_requires_completed_rental() {
    let client = Client::new();
    let owner = create_user(&client, "Olive").await;
    let stranger = create_user(&client, "Sven").await;
    let item = create_item(&client, owner, "Kayak", true).await;

    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item))
        .header(SHARER_HEADER, stranger)
        .json(&json!({ "text": "Great kayak!" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "User did not rent item");
}

#[tokio::test]
#[ignore]
async fn test_item_update_by_non_owner_is_forbidden() {
    let client = Client::new();
    let owner = create_user(&client, "Owen").await;
    let other = create_user(&client, "Nora").await;
    let item = create_item(&client, owner, "Bike", true).await;

    let response = client
        .patch(format!("{}/items/{}", BASE_URL, item))
        .header(SHARER_HEADER, other)
        .json(&json!({ "name": "Stolen bike" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_booking_summary_only_for_owner() {
    let client = Client::new();
    let owner = create_user(&client, "Oskar").await;
    let booker = create_user(&client, "Bella").await;
    let item = create_item(&client, owner, "Projector", true).await;

    let created = client
        .post(format!("{}/bookings", BASE_URL))
        .header(SHARER_HEADER, booker)
        .json(&json!({
            "itemId": item,
            "start": "2030-06-01T10:00:00Z",
            "end": "2030-06-01T12:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to create booking");
    assert_eq!(created.status(), 201);

    let owner_view: Value = client
        .get(format!("{}/items/{}", BASE_URL, item))
        .header(SHARER_HEADER, owner)
        .send()
        .await
        .expect("Failed to fetch item")
        .json()
        .await
        .expect("Failed to parse item");
    assert!(owner_view["nextBooking"].is_object());

    let booker_view: Value = client
        .get(format!("{}/items/{}", BASE_URL, item))
        .header(SHARER_HEADER, booker)
        .send()
        .await
        .expect("Failed to fetch item")
        .json()
        .await
        .expect("Failed to parse item");
    assert!(booker_view["nextBooking"].is_null());
    assert!(booker_view["lastBooking"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_unavailable_item_cannot_be_booked() {
    let client = Client::new();
    let owner = create_user(&client, "Ulla").await;
    let booker = create_user(&client, "Bert").await;
    let item = create_item(&client, owner, "Broken saw", false).await;

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(SHARER_HEADER, booker)
        .json(&json!({
            "itemId": item,
            "start": "2030-06-01T10:00:00Z",
            "end": "2030-06-01T12:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_missing_sharer_header_is_bad_request() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_unknown_booking_state_is_bad_request() {
    let client = Client::new();
    let user = create_user(&client, "Stan").await;

    let response = client
        .get(format!("{}/bookings?state=SOMETIME", BASE_URL))
        .header(SHARER_HEADER, user)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Unknown state: SOMETIME");
}
