//! File-based room storage

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Reservation, Room, RoomDetails};
use super::repository::RoomRepository;
use crate::store::{DeleteResult, InsertOneResult, JsonCollection, UpdateResult};
use crate::user::normalize_email;
use crate::Result;

/// Room collection persisted as JSON
pub struct FileRoomStore {
    rooms: JsonCollection<Room>,
}

impl FileRoomStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            rooms: JsonCollection::open(path).await?,
        })
    }
}

#[async_trait]
impl RoomRepository for FileRoomStore {
    async fn list(&self, category: Option<&str>) -> Result<Vec<Room>> {
        Ok(self
            .rooms
            .find(|room| category.map_or(true, |category| room.details.category == category))
            .await)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Room>> {
        Ok(self.rooms.find_one(|room| room.id == id).await)
    }

    async fn insert(&self, room: Room) -> Result<InsertOneResult> {
        room.details.validate()?;
        self.rooms.insert_one(room).await
    }

    async fn list_by_host(&self, email: &str) -> Result<Vec<Room>> {
        let email = normalize_email(email)?;
        Ok(self.rooms.find(|room| room.host.email == email).await)
    }

    async fn delete(&self, id: Uuid) -> Result<DeleteResult> {
        self.rooms.delete_one(|room| room.id == id).await
    }

    async fn update_details(&self, id: Uuid, details: RoomDetails) -> Result<UpdateResult> {
        details.validate()?;
        self.rooms
            .update_one(|room| room.id == id, |room| room.details = details)
            .await
    }

    async fn set_booked(&self, id: Uuid, booked: bool) -> Result<UpdateResult> {
        self.rooms
            .update_one(
                |room| room.id == id,
                |room| {
                    room.booked = booked;
                    if !booked {
                        room.reserved_by = None;
                    }
                },
            )
            .await
    }

    async fn reserve(&self, id: Uuid, booking_id: Uuid) -> Result<Reservation> {
        let result = self
            .rooms
            .update_one(
                |room| room.id == id && (!room.booked || room.reserved_by == Some(booking_id)),
                |room| {
                    room.booked = true;
                    room.reserved_by = Some(booking_id);
                },
            )
            .await?;

        if result.matched_count == 1 {
            return Ok(Reservation::Reserved);
        }
        match self.get(id).await? {
            Some(_) => Ok(Reservation::AlreadyBooked),
            None => Ok(Reservation::Missing),
        }
    }

    async fn count(&self, host_email: Option<&str>) -> Result<u64> {
        let host_email = host_email.map(normalize_email).transpose()?;
        Ok(self
            .rooms
            .count(|room| {
                host_email
                    .as_deref()
                    .map_or(true, |email| room.host.email == email)
            })
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{sample_details, sample_room};
    use tempfile::TempDir;

    async fn create_test_store() -> (FileRoomStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileRoomStore::new(temp_dir.path().join("rooms.json"))
            .await
            .unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn list_filters_by_category() {
        let (store, _temp) = create_test_store().await;
        let mut beach = sample_room(90.0, "hana@example.com");
        beach.details.category = "Beach".to_string();
        store.insert(beach).await.unwrap();
        store
            .insert(sample_room(120.0, "hana@example.com"))
            .await
            .unwrap();

        assert_eq!(store.list(None).await.unwrap().len(), 2);
        let beaches = store.list(Some("Beach")).await.unwrap();
        assert_eq!(beaches.len(), 1);
        assert_eq!(beaches[0].details.category, "Beach");
    }

    #[tokio::test]
    async fn host_listing_and_count_use_host_email() {
        let (store, _temp) = create_test_store().await;
        store.insert(sample_room(90.0, "hana@example.com")).await.unwrap();
        store.insert(sample_room(70.0, "luis@example.com")).await.unwrap();

        assert_eq!(store.list_by_host("HANA@example.com").await.unwrap().len(), 1);
        assert_eq!(store.count(Some("luis@example.com")).await.unwrap(), 1);
        assert_eq!(store.count(None).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn reserve_only_succeeds_once() {
        let (store, _temp) = create_test_store().await;
        let room = sample_room(90.0, "hana@example.com");
        let id = room.id;
        store.insert(room).await.unwrap();

        let first_booking = Uuid::new_v4();
        assert_eq!(store.reserve(id, first_booking).await.unwrap(), Reservation::Reserved);
        assert_eq!(store.reserve(id, first_booking).await.unwrap(), Reservation::Reserved);
        assert_eq!(
            store.reserve(id, Uuid::new_v4()).await.unwrap(),
            Reservation::AlreadyBooked
        );
        assert_eq!(
            store.reserve(Uuid::new_v4(), first_booking).await.unwrap(),
            Reservation::Missing
        );

        let stored = store.get(id).await.unwrap().unwrap();
        assert!(stored.booked);
        assert_eq!(stored.reserved_by, Some(first_booking));
    }

    #[tokio::test]
    async fn concurrent_reservations_admit_one_booking() {
        let (store, _temp) = create_test_store().await;
        let room = sample_room(90.0, "hana@example.com");
        let id = room.id;
        store.insert(room).await.unwrap();

        let (gus, ivy) = (Uuid::new_v4(), Uuid::new_v4());
        let (first, second) = tokio::join!(store.reserve(id, gus), store.reserve(id, ivy));
        let outcomes = [first.unwrap(), second.unwrap()];

        let reserved = outcomes
            .iter()
            .filter(|outcome| **outcome == Reservation::Reserved)
            .count();
        assert_eq!(reserved, 1);
        assert!(outcomes.contains(&Reservation::AlreadyBooked));

        let holder = store.get(id).await.unwrap().unwrap().reserved_by;
        let winner = if outcomes[0] == Reservation::Reserved { gus } else { ivy };
        assert_eq!(holder, Some(winner));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn reservations_across_threads_admit_one_booking() {
        let (store, _temp) = create_test_store().await;
        let room = sample_room(90.0, "hana@example.com");
        let id = room.id;
        store.insert(room).await.unwrap();
        let store = std::sync::Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.reserve(id, Uuid::new_v4()).await })
            })
            .collect();

        let mut reserved = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() == Reservation::Reserved {
                reserved += 1;
            }
        }
        assert_eq!(reserved, 1);
    }

    #[tokio::test]
    async fn releasing_clears_reservation() {
        let (store, _temp) = create_test_store().await;
        let room = sample_room(90.0, "hana@example.com");
        let id = room.id;
        store.insert(room).await.unwrap();
        store.reserve(id, Uuid::new_v4()).await.unwrap();

        let result = store.set_booked(id, false).await.unwrap();
        assert_eq!(result.modified_count, 1);
        let stored = store.get(id).await.unwrap().unwrap();
        assert!(!stored.booked);
        assert!(stored.reserved_by.is_none());
    }

    #[tokio::test]
    async fn update_replaces_details() {
        let (store, _temp) = create_test_store().await;
        let room = sample_room(90.0, "hana@example.com");
        let id = room.id;
        store.insert(room).await.unwrap();

        let mut details = sample_details(150.0);
        details.title = "Renovated cabin".to_string();
        let result = store.update_details(id, details).await.unwrap();
        assert_eq!(result.modified_count, 1);

        let stored = store.get(id).await.unwrap().unwrap();
        assert_eq!(stored.details.title, "Renovated cabin");
        assert_eq!(stored.details.price, 150.0);
    }
}
