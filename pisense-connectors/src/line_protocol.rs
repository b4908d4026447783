//! InfluxDB line protocol encoding
//!
//! `measurement,tag=value field=1i,other=2.5 1700000000000`
//!
//! Tags and fields come out in key order since both live in `BTreeMap`s.
//! Timestamps are written as-is, so the write endpoint must be told the
//! precision (`ms` for points produced by the poll loops).

use std::fmt::Write as _;

use pisense_core::errors::SinkError;
use pisense_core::point::{FieldValue, Point};

/// Escape a measurement name: commas and spaces
pub fn escape_measurement(name: &str) -> String {
    escape(name, &[',', ' '])
}

/// Escape a tag key, tag value or field key: commas, equals signs and spaces
pub fn escape_key(key: &str) -> String {
    escape(key, &[',', '=', ' '])
}

fn escape(raw: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn field_value(value: &FieldValue) -> Result<String, SinkError> {
    match value {
        FieldValue::Integer(v) => Ok(format!("{}i", v)),
        FieldValue::Float(v) if v.is_finite() => Ok(v.to_string()),
        FieldValue::Float(v) => Err(SinkError::Encoding(format!("non-finite field value {}", v))),
    }
}

/// Encode one point as a single line, without the trailing newline
pub fn encode_point(point: &Point) -> Result<String, SinkError> {
    if point.measurement.is_empty() {
        return Err(SinkError::Encoding("empty measurement name".into()));
    }
    if point.fields.is_empty() {
        return Err(SinkError::Encoding(format!("{} has no fields", point.measurement)));
    }

    let mut line = escape_measurement(&point.measurement);

    // Influx rejects empty tag values, skip them
    for (key, value) in point.tags.iter().filter(|(_, v)| !v.is_empty()) {
        let _ = write!(line, ",{}={}", escape_key(key), escape_key(value));
    }

    for (i, (key, value)) in point.fields.iter().enumerate() {
        line.push(if i == 0 { ' ' } else { ',' });
        let _ = write!(line, "{}={}", escape_key(key), field_value(value)?);
    }

    if let Some(ts) = point.timestamp {
        let _ = write!(line, " {}", ts);
    }

    Ok(line)
}

/// Encode a batch, one line per point
pub fn encode_batch(points: &[Point]) -> Result<String, SinkError> {
    let lines = points.iter().map(encode_point).collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}
