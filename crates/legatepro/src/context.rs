//! Shared handler state and the combined API router.

use std::sync::Arc;

use axum::Router;

use crate::auth::service::AuthService;
use crate::auth::session::SessionKeys;
use crate::billing::service::BillingService;
use crate::estates::service::EstateService;
use crate::finance::service::FinanceService;
use crate::readiness::service::ReadinessService;
use crate::records::service::RecordService;
use crate::{auth, billing, estates, finance, readiness, records};

/// Everything a route handler needs, cloned per request.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<AuthService>,
    pub estates: Arc<EstateService>,
    pub records: Arc<RecordService>,
    pub finance: Arc<FinanceService>,
    pub billing: Arc<BillingService>,
    pub readiness: Arc<ReadinessService>,
    pub sessions: Arc<SessionKeys>,
}

/// The full `/api` surface. The caller supplies state and any layers.
pub fn api_router() -> Router<AppContext> {
    Router::new()
        .merge(auth::router::router())
        .merge(estates::router::router())
        .merge(records::router::router())
        .merge(finance::router::router())
        .merge(billing::router::router())
        .merge(readiness::router::router())
}
