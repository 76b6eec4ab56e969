//! Room model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;
use crate::{Error, Result};

/// Host details embedded in rooms and bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshot {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// The host-editable part of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetails {
    pub title: String,
    pub category: String,
    pub location: String,
    /// Nightly price in major currency units
    pub price: f64,
    pub guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl RoomDetails {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("Title cannot be empty".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidInput("Category cannot be empty".to_string()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::InvalidInput(format!("Invalid price {}", self.price)));
        }
        if self.to < self.from {
            return Err(Error::InvalidInput(
                "Availability must end after it starts".to_string(),
            ));
        }
        Ok(())
    }

    /// Price in minor currency units, as charged by the payment provider
    pub fn price_in_minor_units(&self) -> i64 {
        (self.price * 100.0).round() as i64
    }
}

/// A listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: RoomDetails,
    pub host: HostSnapshot,
    #[serde(default)]
    pub booked: bool,
    /// Booking holding the reservation taken during checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_by: Option<Uuid>,
}

impl Document for Room {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Room {
    /// Create an available room
    pub fn new(details: RoomDetails, host: HostSnapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            details,
            host,
            booked: false,
            reserved_by: None,
        }
    }
}

/// Listing submitted by a host
#[derive(Debug, Clone, Deserialize)]
pub struct NewRoom {
    #[serde(flatten)]
    pub details: RoomDetails,
    pub host: HostSnapshot,
}

/// Result of trying to reserve a room for a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    Reserved,
    AlreadyBooked,
    Missing,
}
