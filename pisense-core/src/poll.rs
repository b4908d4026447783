//! Per-sensor poll loop
//!
//! ## Cycle
//!
//! ```text
//! sleep(interval) → read ──err──► log, skip (state untouched)
//!                     │
//!                     ok
//!                     ▼
//!                   gate ──held──► (warming up)
//!                     │
//!                   dedup ──same──► (duplicate)
//!                     │
//!                   points → sink ──err──► log, continue
//! ```
//!
//! Every step after the read is non-fatal. A loop only ends if the sensor
//! driver itself panics.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pisense_core::poll::PollLoop;
//! # use pisense_core::{errors::SinkError, point::Point, traits::{Sink, SensorHandle}};
//! # struct Stdout;
//! # impl Sink for Stdout { fn write(&self, _: &[Point]) -> Result<(), SinkError> { Ok(()) } }
//! # fn open_pm25() -> Box<dyn SensorHandle> { unimplemented!() }
//!
//! let pm25 = PollLoop::new("pm25", open_pm25(), Arc::new(Stdout))
//!     .with_interval(Duration::from_millis(500))
//!     .with_tag("location", "indoors");
//!
//! pm25.run_forever();
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::dedup::DedupFilter;
use crate::point::{points_for, Tags};
use crate::reading::{Reading, SensorKind};
use crate::time::{SystemTime, TimeSource, Timestamp};
use crate::traits::{SensorHandle, Sink};

/// Decides whether a successful reading may leave the loop
///
/// The hooks run on the loop's own thread, in order: `on_cycle` after every
/// read attempt, then `admit` for a successful reading.
pub trait ReadingGate<H: ?Sized>: Send {
    /// Housekeeping that runs every cycle, whether or not the read succeeded
    fn on_cycle(&mut self, _handle: &mut H, _now: Timestamp) {}

    /// Returns false to hold the reading back from dedup and the sink
    fn admit(&mut self, reading: &Reading, now: Timestamp) -> bool;
}

/// Gate that lets every reading through
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGate;

impl<H: ?Sized> ReadingGate<H> for OpenGate {
    fn admit(&mut self, _reading: &Reading, _now: Timestamp) -> bool {
        true
    }
}

/// What happened in one cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The sensor had no sample or the transfer failed
    ReadFailed,
    /// The gate held the reading back
    Held,
    /// Same reading as last time
    Duplicate,
    /// Points were written to the sink
    Emitted(usize),
    /// The sink refused or could not be reached
    SinkFailed,
}

/// Per-loop counters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollStats {
    pub cycles: u64,
    pub read_failures: u64,
    pub held: u64,
    pub duplicates: u64,
    pub points_emitted: u64,
    pub sink_failures: u64,
}

/// Reads one sensor on a fixed interval and forwards new readings
pub struct PollLoop<H, G = OpenGate, C = SystemTime> {
    name: String,
    handle: H,
    sink: Arc<dyn Sink>,
    clock: C,
    gate: G,
    interval: Duration,
    dedup: Option<DedupFilter>,
    tags: Tags,
    stats: PollStats,
}

impl<H: SensorHandle> PollLoop<H> {
    /// Create a loop with the sensor kind's default interval and dedup policy
    pub fn new(name: impl Into<String>, handle: H, sink: Arc<dyn Sink>) -> Self {
        let kind = handle.kind();

        Self {
            name: name.into(),
            handle,
            sink,
            clock: SystemTime,
            gate: OpenGate,
            interval: Duration::from_millis(kind.default_interval_ms()),
            dedup: kind.dedup_by_default().then(DedupFilter::new),
            tags: Tags::new(),
            stats: PollStats::default(),
        }
    }
}

impl<H, G, C> PollLoop<H, G, C>
where
    H: SensorHandle,
    G: ReadingGate<H>,
    C: TimeSource,
{
    /// Throttle slept before each read
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Enable or disable duplicate suppression
    pub fn with_dedup(mut self, enabled: bool) -> Self {
        self.dedup = enabled.then(DedupFilter::new);
        self
    }

    /// Add a tag to every emitted point
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Add several tags to every emitted point
    pub fn with_tags(mut self, tags: &Tags) -> Self {
        self.tags.extend(tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Replace the clock
    pub fn with_clock<C2: TimeSource>(self, clock: C2) -> PollLoop<H, G, C2> {
        PollLoop {
            name: self.name,
            handle: self.handle,
            sink: self.sink,
            clock,
            gate: self.gate,
            interval: self.interval,
            dedup: self.dedup,
            tags: self.tags,
            stats: self.stats,
        }
    }

    /// Replace the gate
    pub fn with_gate<G2: ReadingGate<H>>(self, gate: G2) -> PollLoop<H, G2, C> {
        PollLoop {
            name: self.name,
            handle: self.handle,
            sink: self.sink,
            clock: self.clock,
            gate,
            interval: self.interval,
            dedup: self.dedup,
            tags: self.tags,
            stats: self.stats,
        }
    }

    /// Build a gate from the handle and current time, then install it
    ///
    /// For gates that must talk to the sensor before the first cycle.
    pub fn gated<G2, F>(mut self, start: F) -> PollLoop<H, G2, C>
    where
        G2: ReadingGate<H>,
        F: FnOnce(&mut H, Timestamp) -> G2,
    {
        let now = self.clock.now();
        let gate = start(&mut self.handle, now);
        self.with_gate(gate)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SensorKind {
        self.handle.kind()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }

    pub fn stats(&self) -> &PollStats {
        &self.stats
    }

    pub fn dedup_enabled(&self) -> bool {
        self.dedup.is_some()
    }

    /// Run one cycle without the throttle sleep
    pub fn cycle(&mut self) -> CycleOutcome {
        self.stats.cycles += 1;

        let result = self.handle.read();
        let now = self.clock.now();
        self.gate.on_cycle(&mut self.handle, now);

        let reading = match result {
            Ok(reading) => reading,
            Err(e) => {
                // Sensors regularly miss a sample window; try again next cycle
                if e.is_transient() {
                    warn!("{}: read failed: {}", self.name, e);
                } else {
                    error!("{}: read failed: {}", self.name, e);
                }
                self.stats.read_failures += 1;
                return CycleOutcome::ReadFailed;
            }
        };

        if !self.gate.admit(&reading, now) {
            debug!("{}: {} (held)", self.name, reading);
            self.stats.held += 1;
            return CycleOutcome::Held;
        }

        if let Some(dedup) = self.dedup.as_mut() {
            if !dedup.admit(&reading) {
                debug!("{}: no new sample", self.name);
                self.stats.duplicates += 1;
                return CycleOutcome::Duplicate;
            }
        }

        info!("{}", reading);

        let timestamp = self.clock.is_wall_clock().then_some(now);
        let points = points_for(&reading, &self.tags, timestamp);

        match self.sink.write(&points) {
            Ok(()) => {
                self.stats.points_emitted += points.len() as u64;
                CycleOutcome::Emitted(points.len())
            }
            Err(e) => {
                warn!("{}: dropped {} points: {}", self.name, points.len(), e);
                self.stats.sink_failures += 1;
                CycleOutcome::SinkFailed
            }
        }
    }

    /// Sleep, cycle, repeat; never returns
    pub fn run_forever(mut self) -> ! {
        loop {
            thread::sleep(self.interval);
            self.cycle();
        }
    }
}
