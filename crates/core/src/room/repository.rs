//! Room repository trait

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Reservation, Room, RoomDetails};
use crate::store::{DeleteResult, InsertOneResult, UpdateResult};
use crate::Result;

/// Repository interface for room listings
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// List rooms, optionally only those of one category
    async fn list(&self, category: Option<&str>) -> Result<Vec<Room>>;

    /// Get a room by ID
    async fn get(&self, id: Uuid) -> Result<Option<Room>>;

    /// Insert a new room
    async fn insert(&self, room: Room) -> Result<InsertOneResult>;

    /// List rooms published by a host
    async fn list_by_host(&self, email: &str) -> Result<Vec<Room>>;

    /// Delete a room by ID
    async fn delete(&self, id: Uuid) -> Result<DeleteResult>;

    /// Replace the editable details of a room
    async fn update_details(&self, id: Uuid, details: RoomDetails) -> Result<UpdateResult>;

    /// Set the availability flag unconditionally
    async fn set_booked(&self, id: Uuid, booked: bool) -> Result<UpdateResult>;

    /// Mark the room booked for `booking_id` only if it is still available.
    ///
    /// Reserving again for the same booking succeeds.
    async fn reserve(&self, id: Uuid, booking_id: Uuid) -> Result<Reservation>;

    /// Count rooms, optionally only those of one host
    async fn count(&self, host_email: Option<&str>) -> Result<u64>;
}
