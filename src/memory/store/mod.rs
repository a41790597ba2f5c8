//! In-memory storage for chunk records.

pub mod bounded_store;

pub use bounded_store::BoundedMemoryStore;
