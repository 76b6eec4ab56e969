//! Booking repository trait

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Booking;
use crate::stats::{SaleRecord, StatsScope};
use crate::store::{DeleteResult, InsertOneResult, UpdateResult};
use crate::Result;

/// Repository interface for bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a booking and mark its transaction spent; a transaction that
    /// was ever spent before is a conflict
    async fn insert(&self, booking: Booking) -> Result<InsertOneResult>;

    /// Get a booking by ID
    async fn get(&self, id: Uuid) -> Result<Option<Booking>>;

    /// Find the booking recorded for a payment transaction
    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Booking>>;

    /// Whether a booking was ever recorded for a payment transaction,
    /// including bookings cancelled since
    async fn is_spent(&self, transaction_id: &str) -> Result<bool>;

    /// Find the booking currently holding a room
    async fn find_by_room(&self, room_id: Uuid) -> Result<Option<Booking>>;

    /// List bookings made by a guest
    async fn list_by_guest(&self, email: &str) -> Result<Vec<Booking>>;

    /// List bookings of rooms published by a host
    async fn list_by_host(&self, email: &str) -> Result<Vec<Booking>>;

    /// List bookings still waiting for their room reservation
    async fn list_pending(&self) -> Result<Vec<Booking>>;

    /// Mark a booking confirmed
    async fn confirm(&self, id: Uuid) -> Result<UpdateResult>;

    /// Cancel a booking by ID; its transaction stays spent
    async fn delete(&self, id: Uuid) -> Result<DeleteResult>;

    /// Drop a booking that never got its room, freeing its transaction
    async fn release(&self, id: Uuid) -> Result<DeleteResult>;

    /// Date and price of every confirmed booking in scope
    async fn sales(&self, scope: &StatsScope) -> Result<Vec<SaleRecord>>;
}
