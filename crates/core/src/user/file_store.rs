//! File-based user storage

use std::path::PathBuf;

use async_trait::async_trait;

use super::model::{normalize_email, UpsertOutcome, User, UserProfile, UserStatus, UserUpdate};
use super::repository::UserRepository;
use crate::store::{JsonCollection, UpdateResult};
use crate::Result;

/// User collection persisted as JSON
pub struct FileUserStore {
    users: JsonCollection<User>,
}

impl FileUserStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            users: JsonCollection::open(path).await?,
        })
    }
}

#[async_trait]
impl UserRepository for FileUserStore {
    async fn upsert(&self, profile: UserProfile) -> Result<UpsertOutcome> {
        let email = normalize_email(&profile.email)?;
        let requested = profile.status == Some(UserStatus::Requested);

        if let Some(existing) = self.users.find_one(|user| user.email == email).await {
            if !requested {
                return Ok(UpsertOutcome::Existing(existing));
            }
        }

        let profile = UserProfile {
            email: email.clone(),
            ..profile
        };
        let result = self
            .users
            .upsert_one(
                |user| user.email == email,
                |user| {
                    if requested {
                        user.status = Some(UserStatus::Requested);
                    }
                },
                || User::from_profile(profile),
            )
            .await?;

        if result.upserted_id.is_some() {
            Ok(UpsertOutcome::Inserted(result))
        } else {
            Ok(UpsertOutcome::Updated(result))
        }
    }

    async fn get(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email)?;
        Ok(self.users.find_one(|user| user.email == email).await)
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.users.find(|_| true).await)
    }

    async fn update(&self, email: &str, update: UserUpdate) -> Result<UpdateResult> {
        let email = normalize_email(email)?;
        self.users
            .update_one(|user| user.email == email, |user| update.apply(user))
            .await
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.users.count(|_| true).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::Role;
    use tempfile::TempDir;

    async fn create_test_store() -> (FileUserStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileUserStore::new(temp_dir.path().join("users.json"))
            .await
            .unwrap();
        (store, temp_dir)
    }

    fn profile(email: &str, status: Option<UserStatus>) -> UserProfile {
        UserProfile {
            email: email.to_string(),
            name: Some("Rae".to_string()),
            image: None,
            status,
        }
    }

    #[tokio::test]
    async fn first_upsert_inserts_guest() {
        let (store, _temp) = create_test_store().await;

        let outcome = store.upsert(profile("rae@example.com", None)).await.unwrap();
        assert!(matches!(outcome, UpsertOutcome::Inserted(ref r) if r.upserted_count == 1));

        let user = store.get("rae@example.com").await.unwrap().unwrap();
        assert_eq!(user.role, Role::Guest);
    }

    #[tokio::test]
    async fn repeated_upsert_is_idempotent() {
        let (store, _temp) = create_test_store().await;
        store.upsert(profile("rae@example.com", None)).await.unwrap();
        let first = store.get("rae@example.com").await.unwrap().unwrap();

        let outcome = store.upsert(profile("rae@example.com", None)).await.unwrap();
        let UpsertOutcome::Existing(existing) = outcome else {
            panic!("expected the stored user back");
        };
        assert_eq!(existing.id, first.id);

        let second = store.get("rae@example.com").await.unwrap().unwrap();
        assert_eq!(second.role, first.role);
        assert_eq!(second.timestamp, first.timestamp);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn requested_status_is_written_on_existing_user() {
        let (store, _temp) = create_test_store().await;
        store.upsert(profile("rae@example.com", None)).await.unwrap();

        let outcome = store
            .upsert(profile("Rae@Example.com", Some(UserStatus::Requested)))
            .await
            .unwrap();
        assert!(matches!(outcome, UpsertOutcome::Updated(ref r) if r.modified_count == 1));

        let user = store.get("rae@example.com").await.unwrap().unwrap();
        assert_eq!(user.status, Some(UserStatus::Requested));
        assert_eq!(user.role, Role::Guest);
    }

    #[tokio::test]
    async fn update_of_unknown_email_matches_nothing() {
        let (store, _temp) = create_test_store().await;
        let result = store
            .update(
                "ghost@example.com",
                UserUpdate {
                    role: Some(Role::Host),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(result.matched_count, 0);
    }
}
