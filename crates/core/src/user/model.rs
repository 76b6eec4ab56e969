//! User model definitions

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Document, UpdateResult};
use crate::{Error, Result};

/// Role that gates which operations a user may perform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Guest,
    Host,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Host => "host",
            Self::Admin => "admin",
        }
    }
}

/// Progress of a guest's request to become a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Requested,
    Verified,
}

/// A stored user account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: Option<UserStatus>,
    /// Milliseconds since the Unix epoch of the last stamped write
    pub timestamp: i64,
}

impl Document for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl User {
    /// Create a guest account from a login profile
    pub fn from_profile(profile: UserProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: profile.email,
            name: profile.name,
            image: profile.image,
            role: Role::Guest,
            status: profile.status,
            timestamp: now_millis(),
        }
    }
}

/// Profile the client submits after signing in
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

/// Partial update merged into a stored user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

impl UserUpdate {
    /// Merge the provided fields and stamp the timestamp
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = Some(name);
        }
        if let Some(image) = self.image {
            user.image = Some(image);
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(status) = self.status {
            user.status = Some(status);
        }
        user.timestamp = now_millis();
    }
}

/// What an upsert-by-email did
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UpsertOutcome {
    /// The user already existed and nothing was written
    Existing(User),
    /// The user already existed and its status was updated
    Updated(UpdateResult),
    /// The user was stored for the first time
    Inserted(UpdateResult),
}

pub fn normalize_email(email: &str) -> Result<String> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return Err(Error::InvalidInput(format!("Invalid email '{}'", email)));
    }
    Ok(normalized)
}

pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
