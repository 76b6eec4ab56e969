//! Document store
//!
//! Collections of JSON documents persisted to disk, plus the result objects
//! their write operations report back to callers.

mod collection;
mod results;

pub use collection::{Document, JsonCollection};
pub use results::{DeleteResult, InsertOneResult, UpdateResult};
