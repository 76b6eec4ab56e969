//! Booking routes

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{delete, get, post},
    Json, Router,
};
use stay_core::booking::{Booking, GuestSnapshot, NewBooking};
use stay_core::store::{DeleteResult, InsertOneResult};
use stay_core::user::{normalize_email, Role};
use tracing::info;
use uuid::Uuid;

use super::{map_core_error, RouteError};
use crate::auth::{authorize, claims_from_headers};
use crate::state::AppState;

async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewBooking>,
) -> Result<Json<InsertOneResult>, RouteError> {
    let claims = claims_from_headers(&state, &headers)?;
    let email = normalize_email(&claims.email).map_err(map_core_error)?;
    let request = NewBooking {
        guest: GuestSnapshot { email, ..req.guest },
        ..req
    };

    let committed = state
        .checkout()
        .commit(request)
        .await
        .map_err(map_core_error)?;

    if committed.replayed {
        info!(
            transaction_id = %committed.booking.transaction_id,
            "Booking already recorded for transaction"
        );
    } else {
        state.notifier().booking_confirmed(&committed.booking);
    }
    Ok(Json(InsertOneResult::new(committed.booking.id)))
}

async fn list_guest_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Result<Json<Vec<Booking>>, RouteError> {
    claims_from_headers(&state, &headers)?;
    let bookings = state
        .bookings()
        .list_by_guest(&email)
        .await
        .map_err(map_core_error)?;
    Ok(Json(bookings))
}

async fn list_host_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Result<Json<Vec<Booking>>, RouteError> {
    authorize(&state, &headers, Role::Host).await?;
    let bookings = state
        .bookings()
        .list_by_host(&email)
        .await
        .map_err(map_core_error)?;
    Ok(Json(bookings))
}

async fn cancel_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResult>, RouteError> {
    let claims = claims_from_headers(&state, &headers)?;
    let result = state.bookings().delete(id).await.map_err(map_core_error)?;
    info!(email = %claims.email, booking_id = %id, deleted = result.deleted_count, "Cancelled booking");
    Ok(Json(result))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/booking", post(create_booking))
        .route("/booking/{id}", delete(cancel_booking))
        .route("/my-bookings/{email}", get(list_guest_bookings))
        .route("/manage-bookings/{email}", get(list_host_bookings))
}
