//! Session cookie helpers

use axum::http::{header, HeaderMap};

/// Name of the cookie carrying the access token
pub const TOKEN_COOKIE: &str = "token";

/// Value of the first cookie named `name` across all `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn attributes(production: bool) -> &'static str {
    if production {
        "HttpOnly; Path=/; Secure; SameSite=None"
    } else {
        "HttpOnly; Path=/; SameSite=Strict"
    }
}

/// `Set-Cookie` value storing the access token
pub fn token_cookie(token: &str, production: bool) -> String {
    format!("{}={}; {}", TOKEN_COOKIE, token, attributes(production))
}

/// `Set-Cookie` value removing the access token
pub fn clear_token_cookie(production: bool) -> String {
    format!("{}=; Max-Age=0; {}", TOKEN_COOKIE, attributes(production))
}
