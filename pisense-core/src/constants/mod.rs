//! Constants for PiSense Core
//!
//! Centralized constants used by the poll loops and the calibration gate.
//! Every duration carries its unit in the name.
//!
//! ## Organization
//!
//! - **Time**: Unit conversions
//! - **Calibration**: Air-quality warm-up and checkpoint windows
//! - **Sensors**: Default poll intervals and sink measurement names

/// Time unit conversions.
pub mod time;

/// Warm-up and baseline checkpoint windows for the air-quality sensor.
pub mod calibration;

/// Poll intervals and measurement naming per sensor kind.
pub mod sensors;

pub use time::{MS_PER_SECOND, MS_PER_MINUTE, MS_PER_HOUR};

pub use calibration::{
    COLD_START_WARM_UP_MS, RESTORED_WARM_UP_MS, BASELINE_CHECKPOINT_INTERVAL_MS,
};

pub use sensors::{
    PARTICULATE_POLL_INTERVAL_MS, CLIMATE_POLL_INTERVAL_MS, AIR_QUALITY_POLL_INTERVAL_MS,
};
