use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of an access token
pub const ACCESS_TOKEN_TTL_DAYS: i64 = 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

fn access_validation() -> Validation {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.required_spec_claims.insert("exp".to_string());
    validation
}

pub fn issue_access_token(secret: &str, email: &str) -> Result<(String, usize), String> {
    let now = Utc::now();
    let claims = AccessClaims {
        email: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(ACCESS_TOKEN_TTL_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map(|token| (token, claims.exp))
    .map_err(|err| format!("Failed to sign access token: {}", err))
}

pub fn verify_access_token(secret: &str, token: &str) -> Result<AccessClaims, String> {
    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &access_validation(),
    )
    .map(|decoded| decoded.claims)
    .map_err(|err| format!("Invalid access token: {}", err))
}
