// src/backend/storage/mod.rs
pub mod audit_logs;
pub mod deceased_marks;
pub mod grants;
pub mod memory;
pub mod messages;
pub mod metrics;
pub mod registrations;
pub mod storable;

// Re-export key storage types for easier access
pub use memory::Memory;
pub use metrics::{get_metrics, update_metrics};
pub use storable::{Cbor, StorableString};
