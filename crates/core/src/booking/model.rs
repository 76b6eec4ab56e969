//! Booking model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::room::{HostSnapshot, Room, RoomDetails};
use crate::store::Document;

/// Lifecycle of a booking inside the checkout saga
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Payment settled, room not yet reserved
    Pending,
    /// Room reserved for this booking
    Confirmed,
}

/// Guest details embedded in a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestSnapshot {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A booking, carrying a copy of the room as it was when paid for
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub room_id: Uuid,
    #[serde(flatten)]
    pub details: RoomDetails,
    pub host: HostSnapshot,
    pub guest: GuestSnapshot,
    /// Payment intent id issued by the payment provider
    pub transaction_id: String,
    /// Amount the payment settled for, in major units
    #[serde(default)]
    pub price_paid: f64,
    pub date: DateTime<Utc>,
    pub status: BookingStatus,
}

impl Document for Booking {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Booking {
    /// Start a booking of `room` for a payment that settled for `price_paid`
    pub fn pending(
        room: &Room,
        guest: GuestSnapshot,
        transaction_id: impl Into<String>,
        price_paid: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id: room.id,
            details: room.details.clone(),
            host: room.host.clone(),
            guest,
            transaction_id: transaction_id.into(),
            price_paid,
            date: Utc::now(),
            status: BookingStatus::Pending,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// A payment transaction that has been turned into a booking.
///
/// Entries outlive the booking so a cancelled booking's payment cannot be
/// spent a second time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpentTransaction {
    pub id: Uuid,
    pub transaction_id: String,
    pub booking_id: Uuid,
    pub recorded_at: DateTime<Utc>,
}

impl Document for SpentTransaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl SpentTransaction {
    pub fn for_booking(booking: &Booking) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id: booking.transaction_id.clone(),
            booking_id: booking.id,
            recorded_at: Utc::now(),
        }
    }
}

/// Booking request sent after the client confirmed the payment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub room_id: Uuid,
    pub guest: GuestSnapshot,
    pub transaction_id: String,
}
