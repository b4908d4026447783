//! Sensor Poll Intervals and Measurement Names
//!
//! Intervals are the throttle slept before each read. They are chosen to
//! sit at or below each sensor's own refresh rate; the particulate sensor
//! streams frames faster than it re-samples, hence dedup on that stream.

// ===== POLL INTERVALS =====

/// Particulate sensor (PMSA003I / PM2.5 UART) poll interval (ms).
pub const PARTICULATE_POLL_INTERVAL_MS: u64 = 500;

/// Temperature/humidity/pressure sensor (BME280) poll interval (ms).
pub const CLIMATE_POLL_INTERVAL_MS: u64 = 10_000;

/// Air-quality sensor (SGP30) poll interval (ms).
///
/// The SGP30 baseline algorithm expects an IAQ measurement every second.
pub const AIR_QUALITY_POLL_INTERVAL_MS: u64 = 1000;

// ===== MEASUREMENT NAMES =====

/// Measurement carrying the three environmental PM fields.
pub const MEASUREMENT_PM: &str = "environmental_pm";

/// Field name used by single-value measurements.
pub const FIELD_VALUE: &str = "value";
