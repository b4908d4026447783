//! Core monitoring engine for PiSense
//!
//! Polls environmental sensors on independent schedules, drops repeated
//! frames, gates the air-quality sensor behind its calibration warm-up and
//! forwards normalized points to a time-series sink.
//!
//! Key properties:
//! - One thread per sensor, no shared mutable state between loops
//! - Nothing short of a driver panic stops a loop
//! - Baselines survive restarts through an atomically replaced JSON file
//!
//! ```no_run
//! use std::sync::Arc;
//! use pisense_core::{MonitorConfig, Supervisor};
//! # use pisense_core::{errors::SinkError, point::Point, traits::*};
//! # struct Influx;
//! # impl Sink for Influx { fn write(&self, _: &[Point]) -> Result<(), SinkError> { Ok(()) } }
//! # fn open_pm25() -> Box<dyn SensorHandle> { unimplemented!() }
//! # fn open_bme280() -> Box<dyn SensorHandle> { unimplemented!() }
//! # fn open_sgp30() -> Box<dyn AirQualitySensor> { unimplemented!() }
//!
//! let config = MonitorConfig::from_file("pisense.json")?;
//! let sink: Arc<dyn Sink> = Arc::new(Influx);
//!
//! let mut supervisor = Supervisor::new();
//! supervisor.spawn(config.poll_loop(open_pm25(), sink.clone()))?;
//! supervisor.spawn(config.poll_loop(open_bme280(), sink.clone()))?;
//! supervisor.spawn(config.calibrated_loop(open_sgp30(), sink))?;
//!
//! // Runs until the process is terminated
//! supervisor.join();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]

pub mod calibration;
pub mod config;
pub mod constants;
pub mod dedup;
pub mod errors;
pub mod point;
pub mod poll;
pub mod reading;
pub mod supervisor;
pub mod time;
pub mod traits;

// Public API
pub use calibration::{Baseline, CalibrationGate, CalibrationPhase, CalibrationStore, SensorIdentity};
pub use config::MonitorConfig;
pub use dedup::DedupFilter;
pub use errors::{ConfigError, SensorError, SinkError, StoreError};
pub use point::{FieldValue, Point};
pub use poll::{CycleOutcome, PollLoop};
pub use reading::{Reading, SensorKind};
pub use supervisor::Supervisor;
pub use traits::{AirQualitySensor, SensorHandle, Sink};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
