//! Access-control behavior through the HTTP surface: sessions, roles, and
//! the sensitive-document gate.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

#[tokio::test]
async fn requests_without_a_session_are_rejected() {
    let app = app();

    let response = send(&app, Method::GET, "/api/estates", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Method::GET,
        "/api/estates",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn non_members_cannot_see_an_estate_exists() {
    let app = app();
    let (owner, _) = register(&app, "owner@example.com").await;
    let (stranger, _) = register(&app, "stranger@example.com").await;
    let estate = create_estate(&app, &owner, "Edith Crane").await;

    let response = send(
        &app,
        Method::GET,
        &format!("/api/estates/{estate}"),
        Some(&stranger),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        Method::GET,
        &format!("/api/estates/{estate}/documents"),
        Some(&stranger),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The stranger's own estate list stays empty.
    let response = send(&app, Method::GET, "/api/estates", Some(&stranger), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn viewers_can_read_but_not_mutate() {
    let app = app();
    let (owner, _) = register(&app, "owner@example.com").await;
    let (viewer, _) = register(&app, "viewer@example.com").await;
    let estate = create_estate(&app, &owner, "Edith Crane").await;
    add_collaborator(&app, &owner, &estate, "viewer@example.com", "VIEWER").await;

    let response = send(
        &app,
        Method::GET,
        &format!("/api/estates/{estate}"),
        Some(&viewer),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["role"], "VIEWER");

    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/estates/{estate}"),
        Some(&viewer),
        Some(json!({ "court": "Polk County Probate" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/documents"),
        Some(&viewer),
        Some(json!({ "label": "Will", "category": "will" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        Method::DELETE,
        &format!("/api/estates/{estate}"),
        Some(&viewer),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn sensitive_documents_are_invisible_to_viewers() {
    let app = app();
    let (owner, _) = register(&app, "owner@example.com").await;
    let (viewer, _) = register(&app, "viewer@example.com").await;
    let estate = create_estate(&app, &owner, "Edith Crane").await;
    add_collaborator(&app, &owner, &estate, "viewer@example.com", "VIEWER").await;

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/documents"),
        Some(&owner),
        Some(json!({
            "label": "Account statements",
            "category": "financial",
            "is_sensitive": true,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sensitive = read_json_body(response).await;
    let sensitive_id = sensitive["id"].as_str().expect("document id").to_string();

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/documents"),
        Some(&owner),
        Some(json!({ "label": "Obituary clipping", "category": "other" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Viewers see only the non-sensitive entry, and a direct fetch of the
    // sensitive one reads as missing rather than forbidden.
    let response = send(
        &app,
        Method::GET,
        &format!("/api/estates/{estate}/documents"),
        Some(&viewer),
        None,
    )
    .await;
    let listed = read_json_body(response).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["label"], "Obituary clipping");

    let response = send(
        &app,
        Method::GET,
        &format!("/api/estates/{estate}/documents/{sensitive_id}"),
        Some(&viewer),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        Method::GET,
        &format!("/api/estates/{estate}/documents/{sensitive_id}"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn editors_manage_records_but_not_collaborators() {
    let app = app();
    let (owner, _) = register(&app, "owner@example.com").await;
    let (editor, _) = register(&app, "editor@example.com").await;
    register(&app, "third@example.com").await;
    let estate = create_estate(&app, &owner, "Edith Crane").await;
    add_collaborator(&app, &owner, &estate, "editor@example.com", "EDITOR").await;

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/contacts"),
        Some(&editor),
        Some(json!({ "name": "Probate Attorney", "phone": "555-0101" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/collaborators"),
        Some(&editor),
        Some(json!({ "email": "third@example.com", "role": "VIEWER" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        Method::DELETE,
        &format!("/api/estates/{estate}"),
        Some(&editor),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn the_owner_cannot_be_removed_or_demoted() {
    let app = app();
    let (owner, owner_id) = register(&app, "owner@example.com").await;
    register(&app, "editor@example.com").await;
    let estate = create_estate(&app, &owner, "Edith Crane").await;
    add_collaborator(&app, &owner, &estate, "editor@example.com", "EDITOR").await;

    let response = send(
        &app,
        Method::DELETE,
        &format!("/api/estates/{estate}/collaborators/{owner_id}"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        Method::PATCH,
        &format!("/api/estates/{estate}/collaborators/{owner_id}"),
        Some(&owner),
        Some(json!({ "role": "VIEWER" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn the_owner_role_cannot_be_granted() {
    let app = app();
    let (owner, _) = register(&app, "owner@example.com").await;
    register(&app, "editor@example.com").await;
    let estate = create_estate(&app, &owner, "Edith Crane").await;

    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/collaborators"),
        Some(&owner),
        Some(json!({ "email": "editor@example.com", "role": "OWNER" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn collaborator_management_errors_map_to_statuses() {
    let app = app();
    let (owner, _) = register(&app, "owner@example.com").await;
    register(&app, "viewer@example.com").await;
    let estate = create_estate(&app, &owner, "Edith Crane").await;

    // Unknown account email.
    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/collaborators"),
        Some(&owner),
        Some(json!({ "email": "nobody@example.com", "role": "VIEWER" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Duplicate membership.
    add_collaborator(&app, &owner, &estate, "viewer@example.com", "VIEWER").await;
    let response = send(
        &app,
        Method::POST,
        &format!("/api/estates/{estate}/collaborators"),
        Some(&owner),
        Some(json!({ "email": "viewer@example.com", "role": "EDITOR" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        Method::GET,
        &format!("/api/estates/{estate}/collaborators"),
        Some(&owner),
        None,
    )
    .await;
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}
