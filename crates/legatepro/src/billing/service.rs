use std::net::IpAddr;
use std::sync::Arc;

use serde::Serialize;

use super::provider::{PaymentProvider, PaymentProviderError};
use super::rate_limit::RateLimiter;
use crate::auth::repository::UserRepository;
use crate::domain::UserId;
use crate::store::RepositoryError;

/// Subscription checkout and billing-portal orchestration.
pub struct BillingService {
    users: Arc<dyn UserRepository>,
    provider: Arc<dyn PaymentProvider>,
    limiter: RateLimiter,
    price_id: Option<String>,
    return_url: String,
}

/// Hosted-session URL handed back to the client for redirect.
#[derive(Debug, Serialize)]
pub struct BillingSessionView {
    pub url: String,
}

impl BillingService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        provider: Arc<dyn PaymentProvider>,
        limiter: RateLimiter,
        price_id: Option<String>,
        return_url: String,
    ) -> Self {
        Self {
            users,
            provider,
            limiter,
            price_id,
            return_url,
        }
    }

    pub async fn checkout(
        &self,
        user_id: UserId,
        client_ip: IpAddr,
    ) -> Result<BillingSessionView, BillingServiceError> {
        if !self.limiter.allow(client_ip) {
            return Err(BillingServiceError::RateLimited);
        }
        let price_id = self
            .price_id
            .clone()
            .ok_or(BillingServiceError::Provider(PaymentProviderError::Unconfigured))?;

        let mut user = self
            .users
            .fetch(&user_id)?
            .ok_or(BillingServiceError::UnknownUser)?;

        let customer_id = match user.stripe_customer_id.clone() {
            Some(id) => id,
            None => {
                let id = self.provider.ensure_customer(&user.email).await?;
                user.stripe_customer_id = Some(id.clone());
                self.users.update(user.clone())?;
                id
            }
        };

        let url = self
            .provider
            .checkout_session(&customer_id, &price_id, &self.return_url)
            .await?;
        Ok(BillingSessionView { url })
    }

    pub async fn portal(
        &self,
        user_id: UserId,
        client_ip: IpAddr,
    ) -> Result<BillingSessionView, BillingServiceError> {
        if !self.limiter.allow(client_ip) {
            return Err(BillingServiceError::RateLimited);
        }

        let user = self
            .users
            .fetch(&user_id)?
            .ok_or(BillingServiceError::UnknownUser)?;
        let customer_id = user
            .stripe_customer_id
            .ok_or(BillingServiceError::NoCustomer)?;

        let url = self
            .provider
            .portal_session(&customer_id, &self.return_url)
            .await?;
        Ok(BillingSessionView { url })
    }
}

/// Error raised by the billing service.
#[derive(Debug, thiserror::Error)]
pub enum BillingServiceError {
    #[error("too many billing requests, slow down")]
    RateLimited,
    #[error("account not found")]
    UnknownUser,
    #[error("no billing profile exists yet; start a checkout first")]
    NoCustomer,
    #[error(transparent)]
    Provider(#[from] PaymentProviderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
