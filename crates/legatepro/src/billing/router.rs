use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};

use super::service::{BillingServiceError, BillingSessionView};
use crate::auth::session::AuthenticatedUser;
use crate::context::AppContext;
use crate::error::ApiError;

pub fn router() -> Router<AppContext> {
    Router::new()
        .route("/api/billing/checkout", post(checkout_handler))
        .route("/api/billing/portal", post(portal_handler))
}

/// Prefer the forwarding header set by the proxy, then the socket peer.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(peer.map(|addr| addr.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

async fn checkout_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Result<Json<BillingSessionView>, ApiError> {
    let ip = client_ip(&headers, peer.map(|info| info.0));
    let session = ctx.billing.checkout(user, ip).await?;
    Ok(Json(session))
}

async fn portal_handler(
    State(ctx): State<AppContext>,
    AuthenticatedUser(user): AuthenticatedUser,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Result<Json<BillingSessionView>, ApiError> {
    let ip = client_ip(&headers, peer.map(|info| info.0));
    let session = ctx.billing.portal(user, ip).await?;
    Ok(Json(session))
}

impl From<BillingServiceError> for ApiError {
    fn from(err: BillingServiceError) -> Self {
        match err {
            BillingServiceError::RateLimited => ApiError::RateLimited,
            BillingServiceError::UnknownUser => ApiError::NotFound(err.to_string()),
            BillingServiceError::NoCustomer => ApiError::Conflict(err.to_string()),
            BillingServiceError::Provider(_) | BillingServiceError::Repository(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}
