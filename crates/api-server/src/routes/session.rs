//! Token issuance and logout

use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stay_core::user::normalize_email;
use tracing::{debug, info};

use super::{map_core_error, route_error, RouteError};
use crate::auth::{clear_token_cookie, issue_access_token, token_cookie};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct TokenRequest {
    email: String,
}

#[derive(Debug, Serialize)]
struct SuccessResponse {
    success: bool,
}

type CookieResponse = ([(HeaderName, String); 1], Json<SuccessResponse>);

async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<CookieResponse, RouteError> {
    let email = normalize_email(&req.email).map_err(map_core_error)?;
    let (token, _exp) = issue_access_token(&state.config().token_secret, &email)
        .map_err(|err| route_error(StatusCode::INTERNAL_SERVER_ERROR, err))?;

    info!(email = %email, "Issued access token");
    Ok((
        [(
            header::SET_COOKIE,
            token_cookie(&token, state.config().is_production()),
        )],
        Json(SuccessResponse { success: true }),
    ))
}

async fn logout(State(state): State<AppState>) -> CookieResponse {
    debug!("Clearing access token cookie");
    (
        [(
            header::SET_COOKIE,
            clear_token_cookie(state.config().is_production()),
        )],
        Json(SuccessResponse { success: true }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jwt", post(issue_token))
        .route("/logout", get(logout))
}

#[cfg(test)]
mod tests {
    use axum::http::{header, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::auth::verify_access_token;
    use crate::test_support::{build_state, json_request, read_json};

    #[tokio::test]
    async fn jwt_sets_http_only_token_cookie() {
        let (state, _tmp) = build_state().await;
        let app = super::router().with_state(state.clone());

        let response = app
            .oneshot(json_request(
                "POST",
                "/jwt",
                None,
                Some(json!({ "email": " Rae@Example.com ", "name": "Rae" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));

        let token = cookie["token=".len()..].split(';').next().unwrap();
        let claims = verify_access_token(&state.config().token_secret, token).unwrap();
        assert_eq!(claims.email, "rae@example.com");

        assert_eq!(read_json(response).await["success"], true);
    }

    #[tokio::test]
    async fn jwt_rejects_invalid_email() {
        let (state, _tmp) = build_state().await;
        let app = super::router().with_state(state);

        let response = app
            .oneshot(json_request("POST", "/jwt", None, Some(json!({ "email": "nobody" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn logout_expires_cookie() {
        let (state, _tmp) = build_state().await;
        let app = super::router().with_state(state);

        let response = app
            .oneshot(json_request("GET", "/logout", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
    }
}
