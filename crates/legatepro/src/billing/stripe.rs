//! Stripe REST client for the [`PaymentProvider`] seam.
//!
//! Uses the form-encoded v1 API: customer search by email, subscription
//! checkout sessions, and billing-portal sessions. Webhook handling is a
//! separate deployment concern and not part of this client.

use async_trait::async_trait;
use serde_json::Value;

use super::provider::{PaymentProvider, PaymentProviderError};

const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";

pub struct StripeHttpProvider {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeHttpProvider {
    pub fn new(secret_key: String) -> Self {
        Self::with_api_base(secret_key, DEFAULT_API_BASE.to_string())
    }

    /// Point the client at a different base URL, e.g. a local stub.
    pub fn with_api_base(secret_key: String, api_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            api_base,
        }
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<Value, PaymentProviderError> {
        let response = self
            .http
            .post(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await
            .map_err(|err| PaymentProviderError::Transport(err.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|err| PaymentProviderError::Protocol(err.to_string()))?;

        if !status.is_success() {
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(PaymentProviderError::Protocol(format!(
                "{status}: {message}"
            )));
        }

        Ok(body)
    }

    fn url_from(body: &Value) -> Result<String, PaymentProviderError> {
        body.get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PaymentProviderError::Protocol("missing session url".to_string()))
    }
}

#[async_trait]
impl PaymentProvider for StripeHttpProvider {
    async fn ensure_customer(&self, email: &str) -> Result<String, PaymentProviderError> {
        let response = self
            .http
            .get(format!("{}/customers", self.api_base))
            .bearer_auth(&self.secret_key)
            .query(&[("email", email), ("limit", "1")])
            .send()
            .await
            .map_err(|err| PaymentProviderError::Transport(err.to_string()))?;
        let body: Value = response
            .json()
            .await
            .map_err(|err| PaymentProviderError::Protocol(err.to_string()))?;

        if let Some(id) = body
            .pointer("/data/0/id")
            .and_then(Value::as_str)
        {
            return Ok(id.to_string());
        }

        let created = self.post_form("/customers", &[("email", email)]).await?;
        created
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PaymentProviderError::Protocol("missing customer id".to_string()))
    }

    async fn checkout_session(
        &self,
        customer_id: &str,
        price_id: &str,
        return_url: &str,
    ) -> Result<String, PaymentProviderError> {
        let body = self
            .post_form(
                "/checkout/sessions",
                &[
                    ("mode", "subscription"),
                    ("customer", customer_id),
                    ("line_items[0][price]", price_id),
                    ("line_items[0][quantity]", "1"),
                    ("success_url", return_url),
                    ("cancel_url", return_url),
                ],
            )
            .await?;
        Self::url_from(&body)
    }

    async fn portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<String, PaymentProviderError> {
        let body = self
            .post_form(
                "/billing_portal/sessions",
                &[("customer", customer_id), ("return_url", return_url)],
            )
            .await?;
        Self::url_from(&body)
    }
}
