//! Core traits for sensors and sinks
//!
//! These are the seams to the outside world. Hardware drivers implement
//! `SensorHandle` (and `AirQualitySensor` for gas sensors with baseline
//! registers); time-series backends implement `Sink`. Keep them small -
//! the poll loops only need to read, and the sink only needs to accept
//! a batch.

use std::sync::Arc;

use crate::calibration::{Baseline, SensorIdentity};
use crate::errors::{SensorError, SinkError};
use crate::point::Point;
use crate::reading::{Reading, SensorKind};

/// A physical sensor that can be read
///
/// `read` may block on the bus. It may also legitimately return the same
/// reading as the previous call when the sensor has not re-sampled yet.
pub trait SensorHandle: Send {
    /// Kind of readings this handle produces
    fn kind(&self) -> SensorKind;

    /// Take one reading
    fn read(&mut self) -> Result<Reading, SensorError>;
}

/// Gas sensor with readable and writable baseline registers
///
/// ## Example Implementation
///
/// ```rust
/// use pisense_core::calibration::{Baseline, SensorIdentity};
/// use pisense_core::errors::SensorError;
/// use pisense_core::reading::{AirQualityReading, Reading, SensorKind};
/// use pisense_core::traits::{AirQualitySensor, SensorHandle};
///
/// struct FakeSgp30 {
///     baseline: Baseline,
/// }
///
/// impl SensorHandle for FakeSgp30 {
///     fn kind(&self) -> SensorKind {
///         SensorKind::AirQuality
///     }
///
///     fn read(&mut self) -> Result<Reading, SensorError> {
///         Ok(AirQualityReading { eco2: 400, tvoc: 0 }.into())
///     }
/// }
///
/// impl AirQualitySensor for FakeSgp30 {
///     fn serial(&mut self) -> Result<SensorIdentity, SensorError> {
///         Ok(SensorIdentity::from("SN123"))
///     }
///
///     fn set_baseline(&mut self, baseline: &Baseline) -> Result<(), SensorError> {
///         self.baseline = *baseline;
///         Ok(())
///     }
///
///     fn baseline(&mut self) -> Result<Baseline, SensorError> {
///         Ok(self.baseline)
///     }
/// }
/// ```
pub trait AirQualitySensor: SensorHandle {
    /// Stable serial number, read once at startup
    fn serial(&mut self) -> Result<SensorIdentity, SensorError>;

    /// Seed the on-chip compensation algorithm
    ///
    /// Returns `SensorError::InvalidBaseline` if the sensor refuses the values.
    fn set_baseline(&mut self, baseline: &Baseline) -> Result<(), SensorError>;

    /// Current baseline as tracked by the sensor
    fn baseline(&mut self) -> Result<Baseline, SensorError>;
}

/// Destination for time-series points
///
/// Shared by every poll loop, so writes take `&self`. Failures are reported
/// and never retried by the caller.
pub trait Sink: Send + Sync {
    /// Write a batch of points
    fn write(&self, points: &[Point]) -> Result<(), SinkError>;
}

impl<H: SensorHandle + ?Sized> SensorHandle for Box<H> {
    fn kind(&self) -> SensorKind {
        (**self).kind()
    }

    fn read(&mut self) -> Result<Reading, SensorError> {
        (**self).read()
    }
}

impl<H: AirQualitySensor + ?Sized> AirQualitySensor for Box<H> {
    fn serial(&mut self) -> Result<SensorIdentity, SensorError> {
        (**self).serial()
    }

    fn set_baseline(&mut self, baseline: &Baseline) -> Result<(), SensorError> {
        (**self).set_baseline(baseline)
    }

    fn baseline(&mut self) -> Result<Baseline, SensorError> {
        (**self).baseline()
    }
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write(&self, points: &[Point]) -> Result<(), SinkError> {
        (**self).write(points)
    }
}
