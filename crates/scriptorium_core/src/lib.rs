//! Persistence core for scriptorium.
//! This crate stores the application's project, job and workflow records
//! in flat, line-oriented text repositories.

pub mod clock;
pub mod logging;
pub mod model;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::Entity;
pub use store::{
    tracking_date_comparator, Decoded, EntityQuery, EntityStore, ParseWarning, RecordCodec,
    StoreError, StoreResult, Tag, TypeDescriptor, TypeRegistry, TypedEntity, WarningSink,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
