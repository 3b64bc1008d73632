//! Financial and work-record behavior: amount normalization, strict partial
//! patches, defaulted statuses, and task completion stamping.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

async fn estate_with_owner(app: &axum::Router) -> (String, String) {
    let (owner, _) = register(app, "owner@example.com").await;
    let estate = create_estate(app, &owner, "Edith Crane").await;
    (owner, estate)
}

#[tokio::test]
async fn amounts_accept_numbers_and_numeric_strings() {
    let app = app();
    let (owner, estate) = estate_with_owner(&app).await;

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/expenses"),
        Some(&owner),
        Some(json!({
            "amount": 125.5,
            "incurred_on": "2026-08-01",
            "description": "Filing fee",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["amount"], 12550);

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/expenses"),
        Some(&owner),
        Some(json!({
            "amount": "88.25",
            "incurred_on": "2026-08-02",
            "description": "Certified copies",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["amount"], 8825);
}

#[tokio::test]
async fn non_numeric_and_negative_amounts_are_rejected() {
    let app = app();
    let (owner, estate) = estate_with_owner(&app).await;

    for amount in [json!("a lot"), json!(-12.5), json!(["125"])] {
        let response = send(
            &app,
            Method::POST,
            &format!("/api/estates/{estate}/expenses"),
            Some(&owner),
            Some(json!({
                "amount": amount,
                "incurred_on": "2026-08-01",
                "description": "Filing fee",
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        assert!(body["error"].as_str().is_some());
    }
}

#[tokio::test]
async fn malformed_bodies_use_the_error_envelope() {
    let app = app();
    let (owner, estate) = estate_with_owner(&app).await;
    let uri = format!("/api/estates/{estate}/expenses");

    // Required fields missing entirely.
    let response = send(&app, Method::POST, &uri, Some(&owner), Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().is_some());

    // Body that is not JSON at all.
    let response = send_raw(
        &app,
        Method::POST,
        &uri,
        Some(&owner),
        "application/json",
        "{not json",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().is_some());

    // Wrong content type.
    let response = send_raw(&app, Method::POST, &uri, Some(&owner), "text/plain", "{}").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn patches_touch_only_the_provided_fields() {
    let app = app();
    let (owner, estate) = estate_with_owner(&app).await;

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/invoices"),
        Some(&owner),
        Some(json!({
            "amount": 350,
            "counterparty": "Clerk of Court",
            "issued_on": "2026-08-10",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let invoice = read_json_body(response).await;
    assert_eq!(invoice["status"], "draft");
    let id = invoice["id"].as_str().expect("invoice id");

    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/estates/{estate}/invoices/{id}"),
        Some(&owner),
        Some(json!({ "status": "paid" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let patched = read_json_body(response).await;
    assert_eq!(patched["status"], "paid");
    assert_eq!(patched["amount"], 35000);
    assert_eq!(patched["counterparty"], "Clerk of Court");
    assert_eq!(patched["issued_on"], "2026-08-10");
}

#[tokio::test]
async fn a_bad_patch_amount_leaves_the_record_unchanged() {
    let app = app();
    let (owner, estate) = estate_with_owner(&app).await;

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/expenses"),
        Some(&owner),
        Some(json!({
            "amount": 42,
            "incurred_on": "2026-08-01",
            "description": "Postage",
        })),
    )
    .await;
    let expense = read_json_body(response).await;
    let id = expense["id"].as_str().expect("expense id");

    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/estates/{estate}/expenses/{id}"),
        Some(&owner),
        Some(json!({ "amount": "??" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        Method::GET,
        &format!("/api/estates/{estate}/expenses/{id}"),
        Some(&owner),
        None,
    )
    .await;
    let body = read_json_body(response).await;
    assert_eq!(body["amount"], 4200);
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn rent_defaults_to_due_until_marked_otherwise() {
    let app = app();
    let (owner, estate) = estate_with_owner(&app).await;

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/rent"),
        Some(&owner),
        Some(json!({
            "amount": "1250.00",
            "property": "14 Maple St",
            "period": "2026-08",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let payment = read_json_body(response).await;
    assert_eq!(payment["status"], "due");
    assert_eq!(payment["amount"], 125000);
    let id = payment["id"].as_str().expect("rent id");

    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/estates/{estate}/rent/{id}"),
        Some(&owner),
        Some(json!({ "status": "received", "received_on": "2026-08-03" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "received");
    assert_eq!(body["received_on"], "2026-08-03");
}

#[tokio::test]
async fn deleted_records_stop_resolving() {
    let app = app();
    let (owner, estate) = estate_with_owner(&app).await;

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/expenses"),
        Some(&owner),
        Some(json!({
            "amount": 10,
            "incurred_on": "2026-08-01",
            "description": "Parking",
        })),
    )
    .await;
    let expense = read_json_body(response).await;
    let id = expense["id"].as_str().expect("expense id");

    let response = send(
        &app,
        Method::DELETE,
        &format!("/api/estates/{estate}/expenses/{id}"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        &app,
        Method::GET,
        &format!("/api/estates/{estate}/expenses/{id}"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn completing_a_task_stamps_completed_at() {
    let app = app();
    let (owner, estate) = estate_with_owner(&app).await;

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/tasks"),
        Some(&owner),
        Some(json!({ "title": "File the will", "due_on": "2026-09-01" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = read_json_body(response).await;
    assert_eq!(task["status"], "open");
    assert!(task["completed_at"].is_null());
    let id = task["id"].as_str().expect("task id");

    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/estates/{estate}/tasks/{id}"),
        Some(&owner),
        Some(json!({ "status": "done" })),
    )
    .await;
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "done");
    assert!(body["completed_at"].is_string());

    // Reopening clears the completion stamp.
    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/estates/{estate}/tasks/{id}"),
        Some(&owner),
        Some(json!({ "status": "open" })),
    )
    .await;
    let body = read_json_body(response).await;
    assert!(body["completed_at"].is_null());
}

#[tokio::test]
async fn pinned_notes_list_first() {
    let app = app();
    let (owner, estate) = estate_with_owner(&app).await;

    for (title, pinned) in [("Background", false), ("Call the court clerk", true)] {
        let response = send(
            &app,
            Method::POST,
            &format!("/api/estates/{estate}/notes"),
            Some(&owner),
            Some(json!({ "title": title, "body": "", "pinned": pinned })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(
        &app,
        Method::GET,
        &format!("/api/estates/{estate}/notes"),
        Some(&owner),
        None,
    )
    .await;
    let body = read_json_body(response).await;
    assert_eq!(body[0]["title"], "Call the court clerk");
    assert_eq!(body[1]["title"], "Background");
}
