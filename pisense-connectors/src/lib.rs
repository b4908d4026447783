//! Sink connectors for PiSense
//!
//! ## Overview
//!
//! Implementations of [`pisense_core::Sink`] that ship points off the device.
//! Each connector is behind its own cargo feature.
//!
//! ### InfluxDB (`influx`, default)
//!
//! Writes batches over the InfluxDB 1.x HTTP API using the line protocol.
//! One request per batch; failures are reported to the poll loop, which
//! logs them and drops the batch. There is no buffering or retry: a sensor
//! produces a fresh reading on its next cycle anyway.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use pisense_connectors::influx::{InfluxConfig, InfluxSink};
//!
//! let config = InfluxConfig::new("http://localhost:8086", "environment")
//!     .basic_auth("pi", "raspberry")
//!     .timeout_secs(5);
//!
//! let sink = InfluxSink::new(config)?;
//! sink.create_database()?;
//! let sink = Arc::new(sink);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod line_protocol;

#[cfg(feature = "influx")]
pub mod influx;

#[cfg(feature = "influx")]
pub use influx::{InfluxAuth, InfluxConfig, InfluxSink};

use thiserror::Error;

/// Errors raised while setting up a connector
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    #[error("Configuration error: {0}")]
    Config(String),
}
