//! Call record persistence
//!
//! One JSON file holds the whole id → record mapping. Every write replaces
//! the file; there is a single writer per process.

mod record;
mod response_store;

pub use record::CallRecord;
pub use response_store::ResponseStore;
