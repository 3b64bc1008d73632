//! Account lifecycle and billing flows through the API.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

#[tokio::test]
async fn register_login_me_round_trip() {
    let app = app();

    let response = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "Executor@Example.com", "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["user"]["email"], "executor@example.com");
    assert!(body["token"].as_str().is_some());
    // Credentials never leak back out.
    assert!(body["user"].get("password_hash").is_none());

    let response = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "executor@example.com", "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let login = read_json_body(response).await;
    let token = login["token"].as_str().expect("token present");

    let response = send(&app, Method::GET, "/api/auth/me", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me = read_json_body(response).await;
    assert_eq!(me["email"], "executor@example.com");
    assert_eq!(me["subscription"], "free");
}

#[tokio::test]
async fn bad_credentials_and_duplicates_are_rejected() {
    let app = app();
    register(&app, "executor@example.com").await;

    let response = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "executor@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "executor@example.com", "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "short@example.com", "password": "short" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkout_returns_a_hosted_session_url() {
    let app = app();
    let (token, _) = register(&app, "executor@example.com").await;

    let response = send(&app, Method::POST, "/api/billing/checkout", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let url = body["url"].as_str().expect("session url");
    assert!(url.starts_with("https://checkout.test/cus_"));

    // The customer id is persisted, so a second checkout lands on the same
    // hosted session.
    let response = send(&app, Method::POST, "/api/billing/checkout", Some(&token), None).await;
    let again = read_json_body(response).await;
    assert_eq!(again["url"].as_str(), Some(url));
}

#[tokio::test]
async fn the_portal_requires_a_prior_checkout() {
    let app = app();
    let (token, _) = register(&app, "executor@example.com").await;

    let response = send(&app, Method::POST, "/api/billing/portal", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, Method::POST, "/api/billing/checkout", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::POST, "/api/billing/portal", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert!(body["url"]
        .as_str()
        .expect("portal url")
        .starts_with("https://portal.test/"));
}

#[tokio::test]
async fn billing_requests_are_rate_limited_per_client_ip() {
    let app = app();
    let (token, _) = register(&app, "executor@example.com").await;

    for _ in 0..BILLING_RATE_LIMIT {
        let response = send_from_ip(
            &app,
            Method::POST,
            "/api/billing/checkout",
            Some(&token),
            Some("203.0.113.9"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = send_from_ip(
        &app,
        Method::POST,
        "/api/billing/checkout",
        Some(&token),
        Some("203.0.113.9"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().is_some());

    // A different client address is unaffected.
    let response = send_from_ip(
        &app,
        Method::POST,
        "/api/billing/checkout",
        Some(&token),
        Some("203.0.113.10"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn billing_endpoints_require_a_session() {
    let app = app();

    let response = send(&app, Method::POST, "/api/billing/checkout", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, Method::POST, "/api/billing/portal", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
