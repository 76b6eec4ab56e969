//! Room module
//!
//! Listings published by hosts and their availability flag.

mod file_store;
mod model;
mod repository;

pub use file_store::FileRoomStore;
pub use model::*;
pub use repository::RoomRepository;
