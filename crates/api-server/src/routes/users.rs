//! User account routes

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, patch, put},
    Json, Router,
};
use stay_core::notify::Email;
use stay_core::store::UpdateResult;
use stay_core::user::{normalize_email, Role, UpsertOutcome, User, UserProfile, UserUpdate};
use tracing::info;

use super::{map_core_error, RouteError};
use crate::auth::authorize;
use crate::state::AppState;

async fn upsert_user(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<UpsertOutcome>, RouteError> {
    let email = normalize_email(&profile.email).map_err(map_core_error)?;
    let outcome = state.users().upsert(profile).await.map_err(map_core_error)?;

    match &outcome {
        UpsertOutcome::Inserted(_) => {
            info!(email = %email, "Registered new user");
            state.notifier().dispatch(Email::welcome(email));
        }
        UpsertOutcome::Updated(_) => info!(email = %email, "User requested host status"),
        UpsertOutcome::Existing(_) => {}
    }

    Ok(Json(outcome))
}

async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Option<User>>, RouteError> {
    let user = state.users().get(&email).await.map_err(map_core_error)?;
    Ok(Json(user))
}

async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, RouteError> {
    authorize(&state, &headers, Role::Admin).await?;
    let users = state.users().list().await.map_err(map_core_error)?;
    Ok(Json(users))
}

async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(email): Path<String>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<UpdateResult>, RouteError> {
    let admin = authorize(&state, &headers, Role::Admin).await?;
    let result = state
        .users()
        .update(&email, update)
        .await
        .map_err(map_core_error)?;
    info!(admin = %admin.email, target = %email, modified = result.modified_count, "Updated user");
    Ok(Json(result))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", put(upsert_user))
        .route("/user/{email}", get(get_user))
        .route("/users", get(list_users))
        .route("/user/update/{email}", patch(update_user))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use stay_core::user::Role;
    use tower::ServiceExt;

    use crate::test_support::{
        build_harness, build_state, json_request, read_json, seed_user, session_cookie,
    };

    #[tokio::test]
    async fn first_upsert_stores_guest_and_sends_welcome() {
        let harness = build_harness().await;
        let app = super::router().with_state(harness.state.clone());

        let response = app
            .oneshot(json_request(
                "PUT",
                "/user",
                None,
                Some(json!({ "email": "Rae@Example.com", "name": "Rae" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["upsertedCount"], 1);
        assert!(body["upsertedId"].is_string());

        let user = harness.state.users().get("rae@example.com").await.unwrap().unwrap();
        assert_eq!(user.role, Role::Guest);

        for _ in 0..50 {
            if !harness.mailer.sent.lock().await.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let sent = harness.mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "rae@example.com");
    }

    #[tokio::test]
    async fn repeated_upsert_returns_stored_user() {
        let (state, _tmp) = build_state().await;
        let app = super::router().with_state(state);
        let put = || json_request("PUT", "/user", None, Some(json!({ "email": "rae@example.com" })));

        app.clone().oneshot(put()).await.unwrap();
        let first = read_json(
            app.clone()
                .oneshot(json_request("GET", "/user/rae@example.com", None, None))
                .await
                .unwrap(),
        )
        .await;

        let second = read_json(app.clone().oneshot(put()).await.unwrap()).await;
        assert_eq!(second["email"], "rae@example.com");
        assert_eq!(second["timestamp"], first["timestamp"]);
    }

    #[tokio::test]
    async fn host_request_only_updates_status() {
        let (state, _tmp) = build_state().await;
        let app = super::router().with_state(state.clone());
        seed_user(&state, "rae@example.com", Role::Guest).await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/user",
                None,
                Some(json!({ "email": "rae@example.com", "name": "Renamed", "status": "Requested" })),
            ))
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body["modifiedCount"], 1);

        let user = state.users().get("rae@example.com").await.unwrap().unwrap();
        assert_eq!(user.name.as_deref(), Some("rae"));
        assert_eq!(serde_json::to_value(user.status).unwrap(), json!("Requested"));
    }

    #[tokio::test]
    async fn unknown_user_is_null() {
        let (state, _tmp) = build_state().await;
        let app = super::router().with_state(state);

        let response = app
            .oneshot(json_request("GET", "/user/ghost@example.com", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, Value::Null);
    }

    #[tokio::test]
    async fn listing_users_requires_admin() {
        let (state, _tmp) = build_state().await;
        seed_user(&state, "gus@example.com", Role::Guest).await;
        seed_user(&state, "ada@example.com", Role::Admin).await;
        let app = super::router().with_state(state.clone());

        let anonymous = app
            .clone()
            .oneshot(json_request("GET", "/users", None, None))
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let guest = session_cookie(&state, "gus@example.com");
        let forbidden = app
            .clone()
            .oneshot(json_request("GET", "/users", Some(&guest), None))
            .await
            .unwrap();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let admin = session_cookie(&state, "ada@example.com");
        let listed = app
            .oneshot(json_request("GET", "/users", Some(&admin), None))
            .await
            .unwrap();
        assert_eq!(listed.status(), StatusCode::OK);
        assert_eq!(read_json(listed).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn role_change_is_admin_only() {
        let (state, _tmp) = build_state().await;
        seed_user(&state, "gus@example.com", Role::Guest).await;
        seed_user(&state, "ada@example.com", Role::Admin).await;
        let app = super::router().with_state(state.clone());
        let promote = |cookie: &str| {
            json_request(
                "PATCH",
                "/user/update/gus@example.com",
                Some(cookie),
                Some(json!({ "role": "host", "status": "Verified" })),
            )
        };

        let guest = session_cookie(&state, "gus@example.com");
        let denied = app.clone().oneshot(promote(&guest)).await.unwrap();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
        let user = state.users().get("gus@example.com").await.unwrap().unwrap();
        assert_eq!(user.role, Role::Guest);

        let admin = session_cookie(&state, "ada@example.com");
        let response = app.oneshot(promote(&admin)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["modifiedCount"], 1);

        let user = state.users().get("gus@example.com").await.unwrap().unwrap();
        assert_eq!(user.role, Role::Host);
    }
}
