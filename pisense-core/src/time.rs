//! Time management for the monitors
//!
//! Provides clock abstraction so the calibration windows can be driven by
//! the system clock in production and by a hand-advanced clock in tests:
//! - System clock (wall time, milliseconds since the Unix epoch)
//! - Mock clock (shared counter, advanced explicitly)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Timestamp in milliseconds since epoch (or since an arbitrary origin for mocks)
pub type Timestamp = u64;

/// Source of time for the system
///
/// `now()` is called from the poll loop threads, so implementations must be
/// shareable across threads.
pub trait TimeSource: Send + Sync {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn is_wall_clock(&self) -> bool {
        (**self).is_wall_clock()
    }
}

/// System time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Controllable time source for testing
///
/// Clones share the same counter, so a test can hand one clone to a poll
/// loop and advance time from the outside.
#[derive(Debug, Clone, Default)]
pub struct MockTimeSource {
    timestamp: Arc<AtomicU64>,
}

impl MockTimeSource {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp: Arc::new(AtomicU64::new(timestamp)),
        }
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.store(timestamp, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.timestamp.fetch_add(ms, Ordering::SeqCst);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.timestamp.load(Ordering::SeqCst)
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}
