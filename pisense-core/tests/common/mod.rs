//! Common test utilities for integration tests
//!
//! This module provides:
//! - Scripted sensors that replay a fixed sequence of readings
//! - A fake air-quality sensor whose state stays observable after it is
//!   moved into a poll loop
//! - A recording sink

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use pisense_core::{
    calibration::{Baseline, SensorIdentity},
    errors::{SensorError, SinkError},
    point::Point,
    reading::{AirQualityReading, ParticulateReading, Reading, SensorKind},
    traits::{AirQualitySensor, SensorHandle, Sink},
};

pub mod scenarios;

/// Replays a script of read results, then reports `NotReady` forever
pub struct ScriptedSensor {
    kind: SensorKind,
    script: VecDeque<Result<Reading, SensorError>>,
}

impl ScriptedSensor {
    pub fn new(kind: SensorKind, script: Vec<Result<Reading, SensorError>>) -> Self {
        Self { kind, script: script.into() }
    }

    /// Particulate sensor returning frames with the given PM2.5 env values
    pub fn particulate(pm25_env: &[u16]) -> Self {
        let script = pm25_env.iter().map(|v| Ok(pm25(*v))).collect();
        Self::new(SensorKind::Particulate, script)
    }
}

impl SensorHandle for ScriptedSensor {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn read(&mut self) -> Result<Reading, SensorError> {
        self.script.pop_front().unwrap_or(Err(SensorError::NotReady))
    }
}

pub fn pm25(pm25_env: u16) -> Reading {
    ParticulateReading { pm25_env, ..Default::default() }.into()
}

/// Observable state of a [`FakeAirQuality`]
#[derive(Debug)]
pub struct AirQualityState {
    pub serial: String,
    pub accepts_baseline: bool,
    pub applied: Vec<Baseline>,
    pub baseline: Baseline,
    pub reading: AirQualityReading,
    pub reads: usize,
}

/// Air-quality sensor sharing its state with the test
#[derive(Clone)]
pub struct FakeAirQuality {
    pub state: Arc<Mutex<AirQualityState>>,
}

impl FakeAirQuality {
    pub fn new(serial: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(AirQualityState {
                serial: serial.to_owned(),
                accepts_baseline: true,
                applied: Vec::new(),
                baseline: Baseline::new(0x8a1e, 0x8c2f),
                reading: AirQualityReading { eco2: 400, tvoc: 0 },
                reads: 0,
            })),
        }
    }

    pub fn set_reading(&self, eco2: u16, tvoc: u16) {
        self.state.lock().unwrap().reading = AirQualityReading { eco2, tvoc };
    }

    pub fn set_baseline(&self, baseline: Baseline) {
        self.state.lock().unwrap().baseline = baseline;
    }

    pub fn applied(&self) -> Vec<Baseline> {
        self.state.lock().unwrap().applied.clone()
    }

    pub fn reads(&self) -> usize {
        self.state.lock().unwrap().reads
    }
}

impl SensorHandle for FakeAirQuality {
    fn kind(&self) -> SensorKind {
        SensorKind::AirQuality
    }

    fn read(&mut self) -> Result<Reading, SensorError> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        Ok(state.reading.into())
    }
}

impl AirQualitySensor for FakeAirQuality {
    fn serial(&mut self) -> Result<SensorIdentity, SensorError> {
        Ok(SensorIdentity::new(self.state.lock().unwrap().serial.clone()))
    }

    fn set_baseline(&mut self, baseline: &Baseline) -> Result<(), SensorError> {
        let mut state = self.state.lock().unwrap();
        if !state.accepts_baseline {
            return Err(SensorError::InvalidBaseline);
        }
        state.applied.push(*baseline);
        Ok(())
    }

    fn baseline(&mut self) -> Result<Baseline, SensorError> {
        Ok(self.state.lock().unwrap().baseline)
    }
}

/// Sink that keeps every batch it receives
#[derive(Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<Point>>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn batches(&self) -> Vec<Vec<Point>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

impl Sink for RecordingSink {
    fn write(&self, points: &[Point]) -> Result<(), SinkError> {
        self.batches.lock().unwrap().push(points.to_vec());
        Ok(())
    }
}
