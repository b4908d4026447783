//! Monitor configuration
//!
//! Everything here has a default, so an empty JSON object is a valid
//! configuration. A typical file:
//!
//! ```json
//! {
//!   "calibration_file": "/var/lib/pisense/sgp30.json",
//!   "tags": {"location": "indoors"},
//!   "particulate": {"interval_ms": 500},
//!   "climate": {"interval_ms": 10000, "tags": {"sensor": "bme280"}},
//!   "air_quality": {"dedup": false}
//! }
//! ```
//!
//! Device paths and bus wiring are not part of this file; the host opens the
//! sensors and hands the handles in.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationGate, CalibrationStore, CalibrationTimings};
use crate::constants::calibration::DEFAULT_STORE_FILE;
use crate::errors::ConfigError;
use crate::point::Tags;
use crate::poll::{PollLoop, ReadingGate};
use crate::reading::SensorKind;
use crate::time::TimeSource;
use crate::traits::{AirQualitySensor, SensorHandle, Sink};

/// Per-sensor overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    /// Whether the host should start this monitor at all
    pub enabled: bool,
    /// Throttle between reads; the sensor kind's default when absent
    pub interval_ms: Option<u64>,
    /// Duplicate suppression; the sensor kind's default when absent
    pub dedup: Option<bool>,
    /// Extra tags for this sensor's points
    pub tags: Tags,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: None,
            dedup: None,
            tags: Tags::new(),
        }
    }
}

/// Top-level monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Where air-quality baselines are persisted
    pub calibration_file: PathBuf,
    /// Tags added to every point from every sensor
    pub tags: Tags,
    pub particulate: SensorSettings,
    pub climate: SensorSettings,
    pub air_quality: SensorSettings,
    /// Warm-up and checkpoint windows
    pub calibration: CalibrationTimings,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            calibration_file: PathBuf::from(DEFAULT_STORE_FILE),
            tags: Tags::new(),
            particulate: SensorSettings::default(),
            climate: SensorSettings::default(),
            air_quality: SensorSettings::default(),
            calibration: CalibrationTimings::default(),
        }
    }
}

impl MonitorConfig {
    /// Load and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sensors = [&self.particulate, &self.climate, &self.air_quality];
        if sensors.iter().any(|s| s.interval_ms == Some(0)) {
            return Err(ConfigError::Invalid("poll interval must be greater than zero"));
        }
        if self.calibration.checkpoint_interval_ms == 0 {
            return Err(ConfigError::Invalid("checkpoint interval must be greater than zero"));
        }
        if self.calibration_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("calibration file path is empty"));
        }
        Ok(())
    }

    /// Settings for one sensor kind
    pub fn settings(&self, kind: SensorKind) -> &SensorSettings {
        match kind {
            SensorKind::Particulate => &self.particulate,
            SensorKind::Climate => &self.climate,
            SensorKind::AirQuality => &self.air_quality,
        }
    }

    pub fn store(&self) -> CalibrationStore {
        CalibrationStore::new(&self.calibration_file)
    }

    /// Apply interval, dedup and tag settings for the loop's sensor kind
    pub fn configure<H, G, C>(&self, poll: PollLoop<H, G, C>) -> PollLoop<H, G, C>
    where
        H: SensorHandle,
        G: ReadingGate<H>,
        C: TimeSource,
    {
        let settings = self.settings(poll.kind());

        let mut poll = poll.with_tags(&self.tags).with_tags(&settings.tags);
        if let Some(interval_ms) = settings.interval_ms {
            poll = poll.with_interval(Duration::from_millis(interval_ms));
        }
        if let Some(dedup) = settings.dedup {
            poll = poll.with_dedup(dedup);
        }
        poll
    }

    /// Build a configured loop for a sensor without calibration
    pub fn poll_loop<H: SensorHandle>(&self, handle: H, sink: Arc<dyn Sink>) -> PollLoop<H> {
        let name = handle.kind().name();
        self.configure(PollLoop::new(name, handle, sink))
    }

    /// Build a configured, calibration-gated loop for an air-quality sensor
    ///
    /// Reads the serial and the stored baseline right away.
    pub fn calibrated_loop<H: AirQualitySensor>(
        &self,
        handle: H,
        sink: Arc<dyn Sink>,
    ) -> PollLoop<H, CalibrationGate> {
        self.poll_loop(handle, sink)
            .calibrated(self.store(), self.calibration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_object_is_default() {
        let config = MonitorConfig::from_json("{}").unwrap();
        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.calibration_file, PathBuf::from("sgp30.json"));
        assert!(config.air_quality.enabled);
    }

    #[test]
    fn partial_overrides() {
        let config = MonitorConfig::from_json(
            r#"{
                "tags": {"location": "indoors"},
                "climate": {"interval_ms": 5000, "dedup": true},
                "air_quality": {"enabled": false},
                "calibration": {"restored_warm_up_ms": 1000}
            }"#,
        )
        .unwrap();

        assert_eq!(config.tags["location"], "indoors");
        assert_eq!(config.climate.interval_ms, Some(5000));
        assert_eq!(config.climate.dedup, Some(true));
        assert!(!config.air_quality.enabled);
        assert_eq!(config.calibration.restored_warm_up_ms, 1000);
        // Untouched timings keep their defaults
        assert_eq!(config.calibration.cold_start_warm_up_ms, 12 * 60 * 60 * 1000);
    }

    #[test]
    fn zero_interval_rejected() {
        let err = MonitorConfig::from_json(r#"{"particulate": {"interval_ms": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = MonitorConfig::from_json("{\"tags\": ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn from_file_reads_json() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), r#"{"calibration_file": "/tmp/baselines.json"}"#).unwrap();

        let config = MonitorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.store().path(), Path::new("/tmp/baselines.json"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MonitorConfig::from_file("/nonexistent/pisense.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
