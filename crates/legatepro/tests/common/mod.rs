//! Shared harness for the HTTP-level tests: the real API router over the
//! in-memory adapters, plus small request helpers.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use legatepro::activity::ActivityLog;
use legatepro::auth::service::AuthService;
use legatepro::auth::session::SessionKeys;
use legatepro::billing::provider::{PaymentProvider, PaymentProviderError};
use legatepro::billing::rate_limit::RateLimiter;
use legatepro::billing::service::BillingService;
use legatepro::estates::service::EstateService;
use legatepro::finance::domain::{Expense, Invoice, RentPayment};
use legatepro::finance::service::FinanceService;
use legatepro::readiness::assist::PlanAssistant;
use legatepro::readiness::service::ReadinessService;
use legatepro::records::domain::{Contact, EstateDocument, EstateNote, EstateTask};
use legatepro::records::service::RecordService;
use legatepro::store::memory::{
    InMemoryActivity, InMemoryEstates, InMemoryRecords, InMemoryUsers,
};
use legatepro::AppContext;

pub const BILLING_RATE_LIMIT: u32 = 3;
pub const TEST_PASSWORD: &str = "a-long-enough-password";

/// Always-succeeding payment provider so billing flows can run offline.
pub struct FakePayments;

#[async_trait]
impl PaymentProvider for FakePayments {
    async fn ensure_customer(&self, email: &str) -> Result<String, PaymentProviderError> {
        Ok(format!("cus_{}", email.replace(['@', '.'], "-")))
    }

    async fn checkout_session(
        &self,
        customer_id: &str,
        _price_id: &str,
        _return_url: &str,
    ) -> Result<String, PaymentProviderError> {
        Ok(format!("https://checkout.test/{customer_id}"))
    }

    async fn portal_session(
        &self,
        customer_id: &str,
        _return_url: &str,
    ) -> Result<String, PaymentProviderError> {
        Ok(format!("https://portal.test/{customer_id}"))
    }
}

pub fn app() -> Router {
    app_with_assistant(None)
}

pub fn app_with_assistant(assistant: Option<Arc<dyn PlanAssistant>>) -> Router {
    legatepro::api_router().with_state(context(assistant))
}

fn context(assistant: Option<Arc<dyn PlanAssistant>>) -> AppContext {
    let users = Arc::new(InMemoryUsers::default());
    let estates = Arc::new(InMemoryEstates::default());
    let documents: Arc<InMemoryRecords<EstateDocument>> = Arc::new(InMemoryRecords::default());
    let contacts: Arc<InMemoryRecords<Contact>> = Arc::new(InMemoryRecords::default());
    let notes: Arc<InMemoryRecords<EstateNote>> = Arc::new(InMemoryRecords::default());
    let tasks: Arc<InMemoryRecords<EstateTask>> = Arc::new(InMemoryRecords::default());
    let expenses: Arc<InMemoryRecords<Expense>> = Arc::new(InMemoryRecords::default());
    let invoices: Arc<InMemoryRecords<Invoice>> = Arc::new(InMemoryRecords::default());
    let rent: Arc<InMemoryRecords<RentPayment>> = Arc::new(InMemoryRecords::default());
    let activity = ActivityLog::new(Arc::new(InMemoryActivity::default()));
    let sessions = Arc::new(SessionKeys::from_secret("integration-test-secret", 12));

    AppContext {
        auth: Arc::new(AuthService::new(users.clone(), sessions.clone())),
        estates: Arc::new(EstateService::new(
            estates.clone(),
            users.clone(),
            activity.clone(),
        )),
        records: Arc::new(RecordService::new(
            estates.clone(),
            documents.clone(),
            contacts.clone(),
            notes,
            tasks.clone(),
            activity.clone(),
        )),
        finance: Arc::new(FinanceService::new(
            estates.clone(),
            expenses,
            invoices.clone(),
            rent.clone(),
            activity,
        )),
        billing: Arc::new(BillingService::new(
            users,
            Arc::new(FakePayments),
            RateLimiter::per_minute(BILLING_RATE_LIMIT),
            Some("price_test".to_string()),
            "http://localhost:3000/account".to_string(),
        )),
        readiness: Arc::new(ReadinessService::new(
            estates,
            documents,
            tasks,
            invoices,
            rent,
            contacts,
            assistant,
            chrono::Duration::minutes(30),
        )),
        sessions,
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    send_from_ip(app, method, uri, token, None, body).await
}

pub async fn send_from_ip(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    forwarded_for: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(ip) = forwarded_for {
        builder = builder.header("x-forwarded-for", ip);
    }
    let request = match body {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request builds");

    app.clone().oneshot(request).await.expect("router responds")
}

/// Send a request with an arbitrary body and content type, for exercising
/// payloads the JSON helpers cannot produce.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    content_type: &str,
    body: &str,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .expect("request builds");

    app.clone().oneshot(request).await.expect("router responds")
}

pub async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Register an account over the API, returning its bearer token and user id.
pub async fn register(app: &Router, email: &str) -> (String, String) {
    let response = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    let token = body["token"].as_str().expect("token present").to_string();
    let user_id = body["user"]["id"].as_str().expect("user id").to_string();
    (token, user_id)
}

pub async fn create_estate(app: &Router, token: &str, full_name: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/api/estates",
        Some(token),
        Some(json!({ "decedent": { "full_name": full_name } })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    body["id"].as_str().expect("estate id").to_string()
}

/// Add an already-registered account to an estate with the given role.
pub async fn add_collaborator(
    app: &Router,
    owner_token: &str,
    estate_id: &str,
    email: &str,
    role: &str,
) {
    let response = send(
        app,
        Method::POST,
        &format!("/api/estates/{estate_id}/collaborators"),
        Some(owner_token),
        Some(json!({ "email": email, "role": role })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
