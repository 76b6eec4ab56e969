//! User repository trait

use async_trait::async_trait;

use super::model::{UpsertOutcome, User, UserProfile, UserUpdate};
use crate::store::UpdateResult;
use crate::Result;

/// Repository interface for user accounts, addressed by email
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store the profile on first sight; afterwards only a `Requested`
    /// status is written, anything else returns the stored user untouched
    async fn upsert(&self, profile: UserProfile) -> Result<UpsertOutcome>;

    /// Get a user by email
    async fn get(&self, email: &str) -> Result<Option<User>>;

    /// Get all users
    async fn list(&self) -> Result<Vec<User>>;

    /// Merge fields into a user and stamp its timestamp
    async fn update(&self, email: &str, update: UserUpdate) -> Result<UpdateResult>;

    /// Count all users
    async fn count(&self) -> Result<u64>;
}
