//! Time-series points
//!
//! The sink-facing shape of a reading: a measurement name, a tag set and
//! one or more numeric fields. `points_for` is the per-kind transform used
//! by every poll loop.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::sensors::{FIELD_VALUE, MEASUREMENT_PM};
use crate::reading::Reading;
use crate::time::Timestamp;

/// Numeric field value
///
/// Integer channels stay integers so the sink stores them with the right type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        // Widen through the shortest decimal form so 21.45f32 stays 21.45
        let widened = value.to_string().parse::<f64>().unwrap_or(f64::from(value));
        FieldValue::Float(widened)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

/// Tag set attached to points, e.g. `location=indoors`
pub type Tags = BTreeMap<String, String>;

/// One measurement written to the sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub measurement: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: Tags,
    pub fields: BTreeMap<String, FieldValue>,
    /// Milliseconds since epoch; `None` lets the sink stamp arrival time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl Point {
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: Tags::new(),
            fields: BTreeMap::new(),
            timestamp: None,
        }
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn tags(mut self, tags: &Tags) -> Self {
        self.tags.extend(tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Transform a reading into sink points
///
/// - particulate: one `environmental_pm` point with `pm10`, `pm25`, `pm100`
///   (environmental values)
/// - climate: `temperature`, `humidity`, `pressure`, each with a `value` field
/// - air quality: `eCO2`, `TVOC`, each with a `value` field
pub fn points_for(reading: &Reading, tags: &Tags, timestamp: Option<Timestamp>) -> Vec<Point> {
    let points = match reading {
        Reading::Particulate(pm) => vec![Point::new(MEASUREMENT_PM)
            .field("pm10", pm.pm10_env)
            .field("pm25", pm.pm25_env)
            .field("pm100", pm.pm100_env)],
        Reading::Climate(c) => vec![
            Point::new("temperature").field(FIELD_VALUE, c.temperature),
            Point::new("humidity").field(FIELD_VALUE, c.humidity),
            Point::new("pressure").field(FIELD_VALUE, c.pressure),
        ],
        Reading::AirQuality(aq) => vec![
            Point::new("eCO2").field(FIELD_VALUE, aq.eco2),
            Point::new("TVOC").field(FIELD_VALUE, aq.tvoc),
        ],
    };

    points
        .into_iter()
        .map(|point| {
            let point = point.tags(tags);
            match timestamp {
                Some(ts) => point.timestamp(ts),
                None => point,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{AirQualityReading, ClimateReading, ParticulateReading};

    #[test]
    fn particulate_batches_three_fields() {
        let reading = Reading::from(ParticulateReading {
            pm10_env: 3,
            pm25_env: 12,
            pm100_env: 20,
            pm25_standard: 99,
            ..Default::default()
        });

        let points = points_for(&reading, &Tags::new(), None);
        assert_eq!(points.len(), 1);

        let pm = &points[0];
        assert_eq!(pm.measurement, "environmental_pm");
        assert_eq!(pm.fields.len(), 3);
        assert_eq!(pm.fields["pm10"], FieldValue::Integer(3));
        assert_eq!(pm.fields["pm25"], FieldValue::Integer(12));
        assert_eq!(pm.fields["pm100"], FieldValue::Integer(20));
    }

    #[test]
    fn climate_one_series_per_channel() {
        let reading = Reading::from(ClimateReading {
            temperature: 21.45,
            humidity: 40.5,
            pressure: 1013.25,
        });

        let points = points_for(&reading, &Tags::new(), Some(1_000));
        let names: Vec<_> = points.iter().map(|p| p.measurement.as_str()).collect();
        assert_eq!(names, ["temperature", "humidity", "pressure"]);

        assert_eq!(points[0].fields["value"], FieldValue::Float(21.45));
        assert!(points.iter().all(|p| p.timestamp == Some(1_000)));
    }

    #[test]
    fn tags_applied_to_every_point() {
        let mut tags = Tags::new();
        tags.insert("location".into(), "indoors".into());

        let reading = Reading::from(AirQualityReading { eco2: 400, tvoc: 0 });
        let points = points_for(&reading, &tags, None);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].measurement, "eCO2");
        assert_eq!(points[1].measurement, "TVOC");
        assert!(points.iter().all(|p| p.tags["location"] == "indoors"));
    }

    #[test]
    fn serializes_without_empty_parts() {
        let point = Point::new("eCO2").field("value", 400u16);
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"measurement":"eCO2","fields":{"value":400}}"#);
    }
}
