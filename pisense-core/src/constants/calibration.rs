//! Air-Quality Calibration Windows
//!
//! MOx gas sensors such as the SGP30 run an on-chip baseline compensation
//! algorithm. Its output is only trustworthy once that baseline has settled,
//! either by running long enough or by being seeded with a baseline saved
//! from an earlier run.

use super::time::{MS_PER_HOUR, MS_PER_MINUTE};

/// Warm-up before logging when no stored baseline could be applied (ms).
///
/// The sensor needs a full self-calibration period before eCO2/TVOC
/// values are accurate enough to record.
///
/// Source: Sensirion SGP30 datasheet, baseline compensation section
pub const COLD_START_WARM_UP_MS: u64 = 12 * MS_PER_HOUR;

/// Warm-up before logging after a stored baseline was accepted (ms).
///
/// The baseline is already seeded, only the heater needs to settle.
pub const RESTORED_WARM_UP_MS: u64 = MS_PER_MINUTE;

/// Interval between baseline snapshots written to the calibration store (ms).
///
/// Source: Sensirion SGP30 driver integration guide (persist hourly)
pub const BASELINE_CHECKPOINT_INTERVAL_MS: u64 = MS_PER_HOUR;

/// Default calibration store file name.
pub const DEFAULT_STORE_FILE: &str = "sgp30.json";
