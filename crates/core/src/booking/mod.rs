//! Booking module
//!
//! Paid reservations of a room by a guest.

mod file_store;
mod model;
mod repository;

pub use file_store::FileBookingStore;
pub use model::*;
pub use repository::BookingRepository;
