//! Request authentication and role checks

use axum::http::HeaderMap;
use stay_core::user::{normalize_email, Role, User};
use tracing::debug;

use super::cookie::{read_cookie, TOKEN_COOKIE};
use super::jwt::{verify_access_token, AccessClaims};
use crate::routes::{forbidden, map_core_error, unauthorized, RouteError};
use crate::state::AppState;

/// Verify the `token` cookie and return its claims
pub fn claims_from_headers(state: &AppState, headers: &HeaderMap) -> Result<AccessClaims, RouteError> {
    let token = read_cookie(headers, TOKEN_COOKIE).ok_or_else(|| {
        debug!("Request without access token cookie");
        unauthorized("unauthorized access")
    })?;

    verify_access_token(&state.config().token_secret, &token).map_err(|err| {
        debug!("{}", err);
        unauthorized("unauthorized access")
    })
}

/// Load the caller and make sure they hold `role`
pub async fn require_role(
    state: &AppState,
    claims: &AccessClaims,
    role: Role,
) -> Result<User, RouteError> {
    let email = normalize_email(&claims.email).map_err(|_| forbidden("forbidden access"))?;
    let user = state
        .users()
        .get(&email)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| {
            debug!(email = %email, "Role check for unknown user");
            forbidden("forbidden access")
        })?;

    if user.role != role {
        debug!(
            email = %email,
            required = role.as_str(),
            actual = user.role.as_str(),
            "Role check failed"
        );
        return Err(forbidden("forbidden access"));
    }
    Ok(user)
}

/// Authenticate the request and require `role` in one step
pub async fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    role: Role,
) -> Result<User, RouteError> {
    let claims = claims_from_headers(state, headers)?;
    require_role(state, &claims, role).await
}
