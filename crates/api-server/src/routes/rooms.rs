//! Room listing routes

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::Deserialize;
use stay_core::room::{HostSnapshot, NewRoom, Room, RoomDetails};
use stay_core::store::{DeleteResult, InsertOneResult, UpdateResult};
use stay_core::user::{Role, User};
use tracing::{debug, info};
use uuid::Uuid;

use super::{forbidden, map_core_error, route_error, RouteError};
use crate::auth::authorize;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct RoomsQuery {
    #[serde(default)]
    category: Option<String>,
}

impl RoomsQuery {
    /// Clients send the literal `null` when no category is selected
    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|category| !category.is_empty() && *category != "null")
    }
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: bool,
}

async fn list_rooms(
    State(state): State<AppState>,
    Query(query): Query<RoomsQuery>,
) -> Result<Json<Vec<Room>>, RouteError> {
    let rooms = state
        .rooms()
        .list(query.category())
        .await
        .map_err(map_core_error)?;
    Ok(Json(rooms))
}

async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<Room>>, RouteError> {
    let room = state.rooms().get(id).await.map_err(map_core_error)?;
    Ok(Json(room))
}

async fn create_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewRoom>,
) -> Result<Json<InsertOneResult>, RouteError> {
    let host = authorize(&state, &headers, Role::Host).await?;
    let snapshot = HostSnapshot {
        email: host.email.clone(),
        ..req.host
    };

    let result = state
        .rooms()
        .insert(Room::new(req.details, snapshot))
        .await
        .map_err(map_core_error)?;
    info!(host = %host.email, room_id = %result.inserted_id, "Published room");
    Ok(Json(result))
}

async fn list_host_rooms(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Result<Json<Vec<Room>>, RouteError> {
    authorize(&state, &headers, Role::Host).await?;
    let rooms = state
        .rooms()
        .list_by_host(&email)
        .await
        .map_err(map_core_error)?;
    Ok(Json(rooms))
}

/// Load a room on behalf of `host`, refusing rooms published by someone else
async fn owned_room(state: &AppState, id: Uuid, host: &User) -> Result<Option<Room>, RouteError> {
    let room = match state.rooms().get(id).await.map_err(map_core_error)? {
        Some(room) => room,
        None => return Ok(None),
    };
    if !room.host.email.eq_ignore_ascii_case(&host.email) {
        debug!(host = %host.email, owner = %room.host.email, room_id = %id, "Room owned by another host");
        return Err(forbidden("forbidden access"));
    }
    Ok(Some(room))
}

async fn delete_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResult>, RouteError> {
    let host = authorize(&state, &headers, Role::Host).await?;
    if owned_room(&state, id, &host).await?.is_none() {
        return Ok(Json(DeleteResult::new(false)));
    }
    let result = state.rooms().delete(id).await.map_err(map_core_error)?;
    info!(host = %host.email, room_id = %id, deleted = result.deleted_count, "Deleted room");
    Ok(Json(result))
}

async fn update_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(details): Json<RoomDetails>,
) -> Result<Json<UpdateResult>, RouteError> {
    let host = authorize(&state, &headers, Role::Host).await?;
    if owned_room(&state, id, &host).await?.is_none() {
        return Ok(Json(UpdateResult::unmatched()));
    }
    let result = state
        .rooms()
        .update_details(id, details)
        .await
        .map_err(map_core_error)?;
    Ok(Json(result))
}

async fn set_room_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<UpdateResult>, RouteError> {
    let host = authorize(&state, &headers, Role::Host).await?;
    if owned_room(&state, id, &host).await?.is_none() {
        return Ok(Json(UpdateResult::unmatched()));
    }

    if !req.status {
        if let Some(booking) = state.bookings().find_by_room(id).await.map_err(map_core_error)? {
            debug!(room_id = %id, booking_id = %booking.id, "Refusing to reopen a held room");
            return Err(route_error(
                StatusCode::CONFLICT,
                "Room is held by a booking; cancel it first",
            ));
        }
    }

    let result = state
        .rooms()
        .set_booked(id, req.status)
        .await
        .map_err(map_core_error)?;
    info!(host = %host.email, room_id = %id, booked = req.status, "Set room status");
    Ok(Json(result))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/room", post(create_room))
        .route("/room/{id}", get(get_room).delete(delete_room))
        .route("/room/update/{id}", put(update_room))
        .route("/room/status/{id}", patch(set_room_status))
        .route("/my-listings/{email}", get(list_host_rooms))
}
