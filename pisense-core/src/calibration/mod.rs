//! Baseline Calibration for Air-Quality Sensors
//!
//! ## Overview
//!
//! MOx gas sensors compensate their raw signal against a slowly drifting
//! baseline. The sensor learns that baseline on its own, but only after
//! running for about twelve hours. Saving the learned baseline and writing it
//! back on the next start cuts the warm-up to a minute.
//!
//! ## Lifecycle
//!
//! ```text
//!   start ──load──► stored baseline? ──no / rejected──► WarmingUp (12 h)
//!                          │
//!                          └──accepted────────────────► WarmingUp (1 min)
//!
//!   WarmingUp ──now >= first_log_time──► Logging   (one way)
//!
//!   every cycle: now >= next_checkpoint ──► read baseline, save, +1 h
//! ```
//!
//! The checkpoint runs in both phases. Readings taken while warming up are
//! held back from the sink but still keep the on-chip algorithm fed.
//!
//! ## Persistence
//!
//! [`CalibrationStore`] keeps one JSON document keyed by sensor serial:
//!
//! ```json
//! {"SN123": {"baseline_primary": 400, "baseline_secondary": 10}}
//! ```
//!
//! Every save rewrites the whole document through a temp file and an atomic
//! rename, so a crash mid-write leaves the previous document in place.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::calibration::{
    BASELINE_CHECKPOINT_INTERVAL_MS, COLD_START_WARM_UP_MS, RESTORED_WARM_UP_MS,
};

pub mod gate;
pub mod store;

pub use gate::{BaselineSource, CalibrationGate, CalibrationPhase, CheckpointOutcome};
pub use store::CalibrationStore;

/// Baseline coefficients of one gas sensor (eCO2 and TVOC baselines)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Baseline {
    pub baseline_primary: u16,
    pub baseline_secondary: u16,
}

impl Baseline {
    pub fn new(baseline_primary: u16, baseline_secondary: u16) -> Self {
        Self { baseline_primary, baseline_secondary }
    }
}

/// Serial number of a sensor, the key its baseline is stored under
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorIdentity(String);

impl SensorIdentity {
    pub fn new(serial: impl Into<String>) -> Self {
        Self(serial.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SensorIdentity {
    fn from(serial: &str) -> Self {
        Self::new(serial)
    }
}

impl From<String> for SensorIdentity {
    fn from(serial: String) -> Self {
        Self(serial)
    }
}

/// Word-array serials (as the SGP30 reports them) render as `[a, b, c]`
impl From<[u16; 3]> for SensorIdentity {
    fn from(words: [u16; 3]) -> Self {
        Self(format!("[{}, {}, {}]", words[0], words[1], words[2]))
    }
}

impl fmt::Display for SensorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Warm-up and checkpoint windows in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationTimings {
    /// Warm-up when no stored baseline could be applied
    pub cold_start_warm_up_ms: u64,
    /// Warm-up after a stored baseline was accepted
    pub restored_warm_up_ms: u64,
    /// Interval between baseline checkpoints
    pub checkpoint_interval_ms: u64,
}

impl Default for CalibrationTimings {
    fn default() -> Self {
        Self {
            cold_start_warm_up_ms: COLD_START_WARM_UP_MS,
            restored_warm_up_ms: RESTORED_WARM_UP_MS,
            checkpoint_interval_ms: BASELINE_CHECKPOINT_INTERVAL_MS,
        }
    }
}
