//! Payment provider integration
//!
//! The server never handles card data. It creates payment intents whose
//! client secret the browser confirms with the provider, then looks the
//! intent up again before recording a booking.

mod stripe;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub use stripe::StripeGateway;

/// Currency every intent is created in
pub const DEFAULT_CURRENCY: &str = "usd";

/// Smallest amount, in minor units, an intent may be created for
pub const MIN_INTENT_AMOUNT: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    #[serde(other)]
    Unknown,
}

/// Provider-side pending charge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Amount in minor currency units
    pub amount: i64,
    pub currency: String,
    pub status: IntentStatus,
}

impl PaymentIntent {
    pub fn is_settled(&self) -> bool {
        self.status == IntentStatus::Succeeded
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an intent for `amount` minor units with automatic payment
    /// method selection
    async fn create_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent>;

    /// Look up an intent by id; an unknown id is `Error::NotFound`
    async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent>;
}

/// Gateway used when no provider key is configured
pub struct UnconfiguredGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredGateway {
    async fn create_intent(&self, _amount: i64, _currency: &str) -> Result<PaymentIntent> {
        Err(Error::ExternalService(
            "Payment provider is not configured".to_string(),
        ))
    }

    async fn retrieve_intent(&self, _id: &str) -> Result<PaymentIntent> {
        Err(Error::ExternalService(
            "Payment provider is not configured".to_string(),
        ))
    }
}
