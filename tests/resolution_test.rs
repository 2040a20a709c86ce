//! Integration tests for the sighting → notification → resolution flow.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use common::TestApp;

fn sighting(hours_ago: i64) -> serde_json::Value {
    json!({
        "latitude": -8.05,
        "longitude": -34.88,
        "dateTime": (Utc::now() - Duration::hours(hours_ago)).to_rfc3339(),
        "description": "Saw a dog like this one near the bakery",
    })
}

#[tokio::test]
async fn test_sighting_notifies_owner() {
    let app = TestApp::new().await;
    let owner = app.register("Ana", "ana@example.com").await;
    let helper = app.register("Bia", "bia@example.com").await;
    let pet_id = app.create_listing(&owner, "Rex").await;

    let response = app
        .request(
            "POST",
            &format!("/pets/{pet_id}/sightings"),
            Some(sighting(2)),
            Some(&helper.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["petId"], pet_id.as_str());
    assert_eq!(response.body["userId"], helper.id.as_str());

    let details = app.request("GET", &format!("/pets/{pet_id}"), None, None).await;
    assert_eq!(details.body["sightings"][0]["reporter"]["name"], "Bia");

    let count = app
        .request("GET", "/notifications/unread-count", None, Some(&owner.token))
        .await;
    assert_eq!(count.body["count"], 1);

    let inbox = app
        .request("GET", "/notifications", None, Some(&owner.token))
        .await;
    let note = &inbox.body[0];
    assert_eq!(note["type"], "sighting");
    assert_eq!(note["title"], "New lead on Rex!");
    assert_eq!(note["link"], format!("/pet/{pet_id}"));
    assert_eq!(note["read"], false);

    let helper_inbox = app
        .request("GET", "/notifications", None, Some(&helper.token))
        .await;
    assert!(helper_inbox.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_sighting_validation() {
    let app = TestApp::new().await;
    let owner = app.register("Ana", "ana@example.com").await;
    let pet_id = app.create_listing(&owner, "Rex").await;
    let path = format!("/pets/{pet_id}/sightings");

    let response = app
        .request("POST", &path, Some(sighting(-24)), Some(&owner.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Sighting date cannot be in the future");

    let response = app
        .request(
            "POST",
            &format!("/pets/{}/sightings", Uuid::new_v4()),
            Some(sighting(1)),
            Some(&owner.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.request("POST", &path, Some(sighting(1)), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mark_read_and_read_all() {
    let app = TestApp::new().await;
    let owner = app.register("Ana", "ana@example.com").await;
    let helper = app.register("Bia", "bia@example.com").await;
    let pet_id = app.create_listing(&owner, "Rex").await;
    let path = format!("/pets/{pet_id}/sightings");
    for hours in [3, 2, 1] {
        let response = app
            .request("POST", &path, Some(sighting(hours)), Some(&helper.token))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let inbox = app
        .request("GET", "/notifications", None, Some(&owner.token))
        .await;
    let first_id = inbox.body[0]["id"].as_str().unwrap().to_string();

    // Marking someone else's notification is a silent no-op.
    let response = app
        .request(
            "PATCH",
            &format!("/notifications/{first_id}/read"),
            None,
            Some(&helper.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request(
            "PATCH",
            &format!("/notifications/{first_id}/read"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let count = app
        .request("GET", "/notifications/unread-count", None, Some(&owner.token))
        .await;
    assert_eq!(count.body["count"], 2);

    let response = app
        .request("PATCH", "/notifications/read-all", None, Some(&owner.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["marked"], 2);

    let count = app
        .request("GET", "/notifications/unread-count", None, Some(&owner.token))
        .await;
    assert_eq!(count.body["count"], 0);
}

#[tokio::test]
async fn test_resolve_with_registered_finder() {
    let app = TestApp::new().await;
    let owner = app.register("Ana", "ana@example.com").await;
    let finder = app.register("Bia", "bia@example.com").await;
    let pet_id = app.create_listing(&owner, "Rex").await;
    let path = format!("/pets/{pet_id}/resolve");

    // Prime the feed cache so resolution has something to invalidate.
    let feed = app.request("GET", "/pets", None, None).await;
    assert_eq!(feed.body["totalItems"], 1);

    let response = app
        .request(
            "PATCH",
            &path,
            Some(json!({
                "finalLatitude": -8.06,
                "finalLongitude": -34.87,
                "finderEmail": "BIA@example.com",
                "foundByExternal": "ignored",
            })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["status"], "finalized");
    assert_eq!(response.body["foundByUserId"], finder.id.as_str());
    assert!(response.body["foundByExternal"].is_null());
    assert!(response.body["resolvedAt"].is_string());

    let feed = app.request("GET", "/pets", None, None).await;
    assert_eq!(feed.body["totalItems"], 0);

    let inbox = app
        .request("GET", "/notifications", None, Some(&finder.token))
        .await;
    assert_eq!(inbox.body[0]["type"], "resolution");
    assert_eq!(inbox.body[0]["title"], "Thanks for helping Rex!");

    let found = app.request("GET", "/my-pets", None, Some(&finder.token)).await;
    let items = found.body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["relation"], "finder");
    assert_eq!(items[0]["owner"]["name"], "Ana");

    let again = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "finalLatitude": 0.0, "finalLongitude": 0.0 })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["message"], "Listing already resolved");

    let late = app
        .request(
            "POST",
            &format!("/pets/{pet_id}/sightings"),
            Some(sighting(1)),
            Some(&finder.token),
        )
        .await;
    assert_eq!(late.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_resolve_guards() {
    let app = TestApp::new().await;
    let owner = app.register("Ana", "ana@example.com").await;
    let stranger = app.register("Eve", "eve@example.com").await;
    let pet_id = app.create_listing(&owner, "Rex").await;
    let path = format!("/pets/{pet_id}/resolve");
    let body = json!({ "finalLatitude": -8.0, "finalLongitude": -34.9 });

    let response = app
        .request("PATCH", &path, Some(body.clone()), Some(&stranger.token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Pet not found or permission denied");

    let response = app
        .request(
            "PATCH",
            &path,
            Some(json!({
                "finalLatitude": -8.0,
                "finalLongitude": -34.9,
                "finderEmail": "ghost@example.com",
            })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body["message"],
        "User with email 'ghost@example.com' not found"
    );

    let response = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "finalLatitude": 123.0, "finalLongitude": 0.0 })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "PATCH",
            &path,
            Some(json!({
                "finalLatitude": -8.0,
                "finalLongitude": -34.9,
                "foundByExternal": "Seu Jorge",
            })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["foundByExternal"], "Seu Jorge");
    assert!(response.body["foundByUserId"].is_null());
}
