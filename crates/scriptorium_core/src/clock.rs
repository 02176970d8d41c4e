//! Injected time source for entity construction.
//!
//! # Responsibility
//! - Provide the "now" timestamp stamped into newly created records.
//!
//! # Invariants
//! - Entity constructors never read wall-clock time directly; they take a
//!   clock so construction stays deterministic under test.

use std::time::{SystemTime, UNIX_EPOCH};

/// Time source measured in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall-clock implementation backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Fixed implementation returning one configured instant.
///
/// Intended for tests and replay paths that need reproducible tracking
/// timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}
