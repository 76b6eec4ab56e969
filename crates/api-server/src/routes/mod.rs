//! Route handlers

pub mod bookings;
pub mod health;
pub mod payments;
pub mod rooms;
pub mod session;
pub mod stats;
pub mod users;

use axum::{http::StatusCode, Json, Router};
use serde::Serialize;
use stay_core::Error;
use tracing::{error, warn};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type RouteError = (StatusCode, Json<ErrorResponse>);

pub fn route_error(status: StatusCode, error: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

pub fn unauthorized(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::UNAUTHORIZED, error)
}

pub fn forbidden(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::FORBIDDEN, error)
}

pub fn bad_request(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::BAD_REQUEST, error)
}

/// Translate a core error into its HTTP status
pub fn map_core_error(err: Error) -> RouteError {
    match err {
        Error::NotFound(msg) => route_error(StatusCode::NOT_FOUND, msg),
        Error::InvalidInput(msg) => bad_request(msg),
        Error::Conflict(msg) => route_error(StatusCode::CONFLICT, msg),
        Error::PaymentNotSettled(msg) => route_error(StatusCode::PAYMENT_REQUIRED, msg),
        Error::ExternalService(msg) => {
            warn!("External service failure: {}", msg);
            route_error(StatusCode::SERVICE_UNAVAILABLE, msg)
        }
        other => {
            error!("Internal error: {}", other);
            route_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

/// All routes of the API
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(session::router())
        .merge(payments::router())
        .merge(users::router())
        .merge(rooms::router())
        .merge(bookings::router())
        .merge(stats::router())
}
