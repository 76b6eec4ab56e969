//! Core library for the Stay Vista rental platform
//!
//! This crate contains the business logic behind the HTTP API:
//! - Users, rooms and bookings with their document-store collections
//! - Payment intents through an external provider
//! - Email notifications
//! - The checkout saga that turns a settled payment into a booking
//! - Sales statistics

pub mod booking;
pub mod checkout;
pub mod error;
pub mod notify;
pub mod payment;
pub mod room;
pub mod stats;
pub mod store;
pub mod user;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test_fixtures;
