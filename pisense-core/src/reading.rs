//! Sensor Readings
//!
//! A reading is the immutable result of one `read()` call. Each sensor kind
//! has a fixed shape with named numeric channels, so equality is structural
//! and dedup falls out of `PartialEq`.
//!
//! ```text
//! Reading
//! ├── Particulate  12 × u16   (standard, env, particle counts)
//! ├── Climate       3 × f32   (temperature, humidity, pressure)
//! └── AirQuality    2 × u16   (eCO2, TVOC)
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::point::FieldValue;

/// Sensor kind enumeration
///
/// Maps to a reading shape, a default poll interval and a dedup policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// PM1.0 / PM2.5 / PM10 particle sensor
    Particulate,
    /// Temperature, humidity and barometric pressure
    Climate,
    /// eCO2 / TVOC gas sensor with baseline calibration
    AirQuality,
}

impl SensorKind {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            SensorKind::Particulate => "particulate",
            SensorKind::Climate => "climate",
            SensorKind::AirQuality => "air_quality",
        }
    }

    /// Whether identical consecutive readings are suppressed by default
    ///
    /// The particulate sensor streams frames faster than it samples. The
    /// air-quality stream goes through the filter once it is logging. Climate
    /// readings are floats that practically never repeat, so they are
    /// forwarded as-is.
    pub const fn dedup_by_default(&self) -> bool {
        match self {
            SensorKind::Particulate | SensorKind::AirQuality => true,
            SensorKind::Climate => false,
        }
    }

    /// Default throttle between reads in milliseconds
    pub const fn default_interval_ms(&self) -> u64 {
        use crate::constants::sensors::*;
        match self {
            SensorKind::Particulate => PARTICULATE_POLL_INTERVAL_MS,
            SensorKind::Climate => CLIMATE_POLL_INTERVAL_MS,
            SensorKind::AirQuality => AIR_QUALITY_POLL_INTERVAL_MS,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Full particulate frame
///
/// `*_standard` values are factory-calibrated for PM at standard
/// particle density, `*_env` values are corrected for ambient conditions.
/// Particle counts are per 0.1 L of air above the given diameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticulateReading {
    pub pm10_standard: u16,
    pub pm25_standard: u16,
    pub pm100_standard: u16,
    pub pm10_env: u16,
    pub pm25_env: u16,
    pub pm100_env: u16,
    pub particles_03um: u16,
    pub particles_05um: u16,
    pub particles_10um: u16,
    pub particles_25um: u16,
    pub particles_50um: u16,
    pub particles_100um: u16,
}

/// Temperature (°C), relative humidity (%) and pressure (hPa)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClimateReading {
    pub temperature: f32,
    pub humidity: f32,
    pub pressure: f32,
}

/// Equivalent CO2 (ppm) and total VOC (ppb)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub eco2: u16,
    pub tvoc: u16,
}

/// One reading from one sensor, tagged by kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reading {
    Particulate(ParticulateReading),
    Climate(ClimateReading),
    AirQuality(AirQualityReading),
}

impl Reading {
    /// Kind of sensor that produced this reading
    pub fn kind(&self) -> SensorKind {
        match self {
            Reading::Particulate(_) => SensorKind::Particulate,
            Reading::Climate(_) => SensorKind::Climate,
            Reading::AirQuality(_) => SensorKind::AirQuality,
        }
    }

    /// All named channels with their values
    pub fn channels(&self) -> Vec<(&'static str, FieldValue)> {
        match self {
            Reading::Particulate(pm) => vec![
                ("pm10_standard", pm.pm10_standard.into()),
                ("pm25_standard", pm.pm25_standard.into()),
                ("pm100_standard", pm.pm100_standard.into()),
                ("pm10_env", pm.pm10_env.into()),
                ("pm25_env", pm.pm25_env.into()),
                ("pm100_env", pm.pm100_env.into()),
                ("particles_03um", pm.particles_03um.into()),
                ("particles_05um", pm.particles_05um.into()),
                ("particles_10um", pm.particles_10um.into()),
                ("particles_25um", pm.particles_25um.into()),
                ("particles_50um", pm.particles_50um.into()),
                ("particles_100um", pm.particles_100um.into()),
            ],
            Reading::Climate(c) => vec![
                ("temperature", c.temperature.into()),
                ("humidity", c.humidity.into()),
                ("pressure", c.pressure.into()),
            ],
            Reading::AirQuality(aq) => vec![
                ("eco2", aq.eco2.into()),
                ("tvoc", aq.tvoc.into()),
            ],
        }
    }

    /// Look up a single channel by name
    pub fn channel(&self, name: &str) -> Option<FieldValue> {
        self.channels()
            .into_iter()
            .find(|(channel, _)| *channel == name)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for Reading {
    /// One-line operator summary, the same shape the monitors log
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Particulate(pm) => write!(
                f,
                "PM env - 1.0:{} 2.5:{} 10:{}",
                pm.pm10_env, pm.pm25_env, pm.pm100_env
            ),
            Reading::Climate(c) => write!(
                f,
                "BME280 - Temp:{:.2}°C Hum:{:.2}% P:{:.2}hPa",
                c.temperature, c.humidity, c.pressure
            ),
            Reading::AirQuality(aq) => {
                write!(f, "SGP30 - eCO2:{} ppm TVOC:{} ppb", aq.eco2, aq.tvoc)
            }
        }
    }
}

impl From<ParticulateReading> for Reading {
    fn from(reading: ParticulateReading) -> Self {
        Reading::Particulate(reading)
    }
}

impl From<ClimateReading> for Reading {
    fn from(reading: ClimateReading) -> Self {
        Reading::Climate(reading)
    }
}

impl From<AirQualityReading> for Reading {
    fn from(reading: AirQualityReading) -> Self {
        Reading::AirQuality(reading)
    }
}
