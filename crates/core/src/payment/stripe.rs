//! Stripe REST client for payment intents

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{PaymentGateway, PaymentIntent};
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Payment gateway backed by the Stripe API
pub struct StripeGateway {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    fn intents_url(&self) -> String {
        format!("{}/v1/payment_intents", self.api_base)
    }

    async fn read_intent(response: reqwest::Response) -> Result<PaymentIntent> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<PaymentIntent>()
                .await
                .map_err(|e| Error::ExternalService(format!("Invalid payment intent: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        let message = provider_message(&body).unwrap_or_else(|| status.to_string());
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(message));
        }
        warn!("Payment provider returned {}: {}", status, message);
        Err(Error::ExternalService(message))
    }
}

fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent> {
        debug!("Creating payment intent for {} {}", amount, currency);
        let params = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        let response = self
            .http
            .post(self.intents_url())
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("Payment provider unreachable: {}", e)))?;

        Self::read_intent(response).await
    }

    async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent> {
        let url = format!("{}/{}", self.intents_url(), urlencoding::encode(id));
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("Payment provider unreachable: {}", e)))?;

        Self::read_intent(response).await
    }
}
