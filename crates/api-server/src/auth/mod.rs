//! Cookie-carried JWT sessions and role checks

mod cookie;
mod guard;
mod jwt;

pub use cookie::{clear_token_cookie, token_cookie};
pub use guard::{authorize, claims_from_headers};
pub use jwt::issue_access_token;

#[cfg(test)]
pub use cookie::TOKEN_COOKIE;
#[cfg(test)]
pub use jwt::verify_access_token;
