use async_trait::async_trait;

/// Outbound payment-processor seam: customer lookup plus hosted
/// checkout/portal session creation.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Find the customer for this email or create one, returning its id.
    async fn ensure_customer(&self, email: &str) -> Result<String, PaymentProviderError>;

    /// Create a hosted subscription checkout session, returning its URL.
    async fn checkout_session(
        &self,
        customer_id: &str,
        price_id: &str,
        return_url: &str,
    ) -> Result<String, PaymentProviderError>;

    /// Create a billing-portal session, returning its URL.
    async fn portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<String, PaymentProviderError>;
}

/// Payment-processor failures.
#[derive(Debug, thiserror::Error)]
pub enum PaymentProviderError {
    #[error("billing is not configured")]
    Unconfigured,
    #[error("payment provider request failed: {0}")]
    Transport(String),
    #[error("payment provider returned an unexpected response: {0}")]
    Protocol(String),
}

/// Stand-in used when no provider credentials are configured; every call
/// fails with [`PaymentProviderError::Unconfigured`].
pub struct UnconfiguredProvider;

#[async_trait]
impl PaymentProvider for UnconfiguredProvider {
    async fn ensure_customer(&self, _email: &str) -> Result<String, PaymentProviderError> {
        Err(PaymentProviderError::Unconfigured)
    }

    async fn checkout_session(
        &self,
        _customer_id: &str,
        _price_id: &str,
        _return_url: &str,
    ) -> Result<String, PaymentProviderError> {
        Err(PaymentProviderError::Unconfigured)
    }

    async fn portal_session(
        &self,
        _customer_id: &str,
        _return_url: &str,
    ) -> Result<String, PaymentProviderError> {
        Err(PaymentProviderError::Unconfigured)
    }
}
