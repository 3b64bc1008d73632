//! Subscription billing: checkout/portal sessions through a payment
//! provider, guarded by a best-effort per-IP rate limit.

pub mod provider;
pub mod rate_limit;
pub mod router;
pub mod service;
pub mod stripe;

pub use provider::{PaymentProvider, PaymentProviderError, UnconfiguredProvider};
pub use rate_limit::RateLimiter;
pub use service::{BillingService, BillingServiceError, BillingSessionView};
pub use stripe::StripeHttpProvider;
