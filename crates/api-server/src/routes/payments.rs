//! Payment intent creation

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stay_core::payment::{DEFAULT_CURRENCY, MIN_INTENT_AMOUNT};
use tracing::info;

use super::{bad_request, map_core_error, route_error, RouteError};
use crate::auth::claims_from_headers;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct PaymentIntentRequest {
    /// Amount in minor currency units
    #[serde(default)]
    price: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentIntentResponse {
    client_secret: String,
}

fn intent_amount(price: Option<f64>) -> Result<i64, RouteError> {
    let price = price.ok_or_else(|| bad_request("price is required"))?;
    if !price.is_finite() {
        return Err(bad_request("price must be a finite number"));
    }
    let amount = price.round() as i64;
    if amount < MIN_INTENT_AMOUNT {
        return Err(bad_request(format!(
            "price must be at least {}",
            MIN_INTENT_AMOUNT
        )));
    }
    Ok(amount)
}

async fn create_payment_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, RouteError> {
    let claims = claims_from_headers(&state, &headers)?;
    let amount = intent_amount(req.price)?;

    let intent = state
        .payments()
        .create_intent(amount, DEFAULT_CURRENCY)
        .await
        .map_err(map_core_error)?;
    info!(email = %claims.email, intent_id = %intent.id, amount, "Created payment intent");

    let client_secret = intent.client_secret.ok_or_else(|| {
        route_error(
            StatusCode::BAD_GATEWAY,
            "Payment provider returned no client secret",
        )
    })?;
    Ok(Json(PaymentIntentResponse { client_secret }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/create-payment-intent", post(create_payment_intent))
}
