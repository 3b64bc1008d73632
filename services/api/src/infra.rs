use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use legatepro::activity::ActivityLog;
use legatepro::auth::service::AuthService;
use legatepro::auth::session::SessionKeys;
use legatepro::billing::provider::{PaymentProvider, UnconfiguredProvider};
use legatepro::billing::rate_limit::RateLimiter;
use legatepro::billing::service::BillingService;
use legatepro::billing::stripe::StripeHttpProvider;
use legatepro::config::AppConfig;
use legatepro::estates::service::EstateService;
use legatepro::finance::domain::{Expense, Invoice, RentPayment};
use legatepro::finance::service::FinanceService;
use legatepro::readiness::assist::{HttpPlanAssistant, PlanAssistant};
use legatepro::readiness::service::ReadinessService;
use legatepro::records::domain::{Contact, EstateDocument, EstateNote, EstateTask};
use legatepro::records::service::RecordService;
use legatepro::store::memory::{
    InMemoryActivity, InMemoryEstates, InMemoryRecords, InMemoryUsers,
};
use legatepro::AppContext;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::warn;

/// Readiness flag and metrics handle shared with the ops endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

const READINESS_CACHE_TTL_MINUTES: i64 = 30;

/// Wire the full service graph over the in-memory adapters.
pub(crate) fn build_context(config: &AppConfig) -> AppContext {
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

    let sessions = Arc::new(SessionKeys::from_secret(
        &config.session.secret,
        config.session.ttl_hours,
    ));

    let provider: Arc<dyn PaymentProvider> = match &config.billing.secret_key {
        Some(secret_key) => Arc::new(StripeHttpProvider::new(secret_key.clone())),
        None => {
            warn!("STRIPE_SECRET_KEY not set, billing endpoints will reject requests");
            Arc::new(UnconfiguredProvider)
        }
    };

    let assistant: Option<Arc<dyn PlanAssistant>> = config.assist.endpoint.as_ref().map(|url| {
        Arc::new(HttpPlanAssistant::new(
            url.clone(),
            config.assist.api_key.clone(),
            config.assist.model.clone(),
        )) as Arc<dyn PlanAssistant>
    });

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
            provider,
            RateLimiter::per_minute(config.billing.rate_limit_per_minute),
            config.billing.price_id.clone(),
            config.billing.return_url.clone(),
        )),
        readiness: Arc::new(ReadinessService::new(
            estates,
            documents,
            tasks,
            invoices,
            rent,
            contacts,
            assistant,
            chrono::Duration::minutes(READINESS_CACHE_TTL_MINUTES),
        )),
        sessions,
    }
}
