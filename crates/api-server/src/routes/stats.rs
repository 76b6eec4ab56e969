//! Dashboard statistics

use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};
use serde::Serialize;
use stay_core::stats::{SalesSummary, StatsScope};
use stay_core::user::{normalize_email, Role};

use super::{map_core_error, RouteError};
use crate::auth::{authorize, claims_from_headers};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminStats {
    total_users: u64,
    total_rooms: u64,
    #[serde(flatten)]
    sales: SalesSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HostStats {
    total_rooms: u64,
    #[serde(flatten)]
    sales: SalesSummary,
    host_since: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GuestStats {
    #[serde(flatten)]
    sales: SalesSummary,
    guest_since: Option<i64>,
}

async fn sales_summary(state: &AppState, scope: StatsScope) -> Result<SalesSummary, RouteError> {
    let records = state.bookings().sales(&scope).await.map_err(map_core_error)?;
    Ok(SalesSummary::from_records(&records))
}

async fn admin_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AdminStats>, RouteError> {
    authorize(&state, &headers, Role::Admin).await?;

    let total_users = state.users().count().await.map_err(map_core_error)?;
    let total_rooms = state.rooms().count(None).await.map_err(map_core_error)?;
    let sales = sales_summary(&state, StatsScope::All).await?;

    Ok(Json(AdminStats {
        total_users,
        total_rooms,
        sales,
    }))
}

async fn host_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<HostStats>, RouteError> {
    let host = authorize(&state, &headers, Role::Host).await?;

    let total_rooms = state
        .rooms()
        .count(Some(&host.email))
        .await
        .map_err(map_core_error)?;
    let sales = sales_summary(&state, StatsScope::Host(host.email.clone())).await?;

    Ok(Json(HostStats {
        total_rooms,
        sales,
        host_since: host.timestamp,
    }))
}

async fn guest_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GuestStats>, RouteError> {
    let claims = claims_from_headers(&state, &headers)?;
    let email = normalize_email(&claims.email).map_err(map_core_error)?;

    let guest = state.users().get(&email).await.map_err(map_core_error)?;
    let sales = sales_summary(&state, StatsScope::Guest(email)).await?;

    Ok(Json(GuestStats {
        sales,
        guest_since: guest.map(|user| user.timestamp),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin-stat", get(admin_stats))
        .route("/host-stat", get(host_stats))
        .route("/guest-stat", get(guest_stats))
}
