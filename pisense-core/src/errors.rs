//! Error Types for Sensor Monitoring
//!
//! ## Error Categories
//!
//! Errors are split by the collaborator that produced them, because each one
//! has its own recovery policy inside the poll loops:
//!
//! ### Sensor Errors
//! - `NotReady` / `Frame`: transient read failures. The cycle is skipped and
//!   retried on the next tick, nothing else changes.
//! - `InvalidBaseline`: the sensor refused a stored baseline. The calibration
//!   gate falls back to a cold start.
//!
//! ### Sink Errors
//! - Logged and dropped. The point is lost, the loop keeps its schedule.
//!
//! ### Store Errors
//! - Raised by `CalibrationStore::save` only. The next hourly checkpoint
//!   supersedes a failed one, there is no backlog.
//!
//! None of these are process-fatal.
//!
//! ```rust
//! use pisense_core::errors::SensorError;
//!
//! fn should_retry(err: &SensorError) -> bool {
//!     err.is_transient()
//! }
//!
//! assert!(should_retry(&SensorError::NotReady));
//! assert!(!should_retry(&SensorError::InvalidBaseline));
//! ```

use thiserror::Error;

/// Failures reported by a sensor handle
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SensorError {
    /// No new sample is available yet
    #[error("Sensor not ready")]
    NotReady,

    /// A frame arrived but failed its checksum or length check
    #[error("Malformed frame: {0}")]
    Frame(String),

    /// The sensor rejected the baseline it was asked to apply
    #[error("Sensor rejected baseline values")]
    InvalidBaseline,

    /// Bus or serial port failure
    #[error("Transport error: {0}")]
    Transport(String),
}

impl SensorError {
    /// Whether skipping the cycle and reading again later is the right response
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NotReady | Self::Frame(_) | Self::Transport(_))
    }
}

/// Failures reported by a time-series sink
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SinkError {
    /// Network or connection failure
    #[error("Sink transport failed: {0}")]
    Transport(String),

    /// The sink answered but refused the batch
    #[error("Sink rejected write ({status}): {message}")]
    Rejected {
        /// Status code returned by the sink
        status: u16,
        /// Body of the rejection, if any
        message: String,
    },

    /// Points could not be encoded for the sink
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Failures while persisting calibration state
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the store file failed
    #[error("Calibration store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be serialized
    #[error("Calibration store serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The temp file could not be renamed over the store
    #[error("Calibration store replace failed: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Failures while loading monitor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for this schema
    #[error("Config parse failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration parsed but holds unusable values
    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(SensorError::NotReady.is_transient());
        assert!(SensorError::Frame("bad checksum".into()).is_transient());
        assert!(SensorError::Transport("i2c nack".into()).is_transient());
        assert!(!SensorError::InvalidBaseline.is_transient());
    }

    #[test]
    fn sink_error_display() {
        let err = SinkError::Rejected { status: 400, message: "bad line".into() };
        assert_eq!(err.to_string(), "Sink rejected write (400): bad line");
    }
}
