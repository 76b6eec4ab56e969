//! User module
//!
//! Accounts keyed by email, their roles and the host-upgrade status.

mod file_store;
mod model;
mod repository;

pub use file_store::FileUserStore;
pub use model::*;
pub use repository::UserRepository;
