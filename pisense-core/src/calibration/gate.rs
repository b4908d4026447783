//! Warm-up gating and baseline checkpoints
//!
//! `CalibrationGate` plugs into a [`PollLoop`] as its [`ReadingGate`]. It
//! holds readings back until the warm-up window has passed and snapshots the
//! sensor's baseline into the [`CalibrationStore`] on a fixed interval.

use log::{info, warn};

use super::{Baseline, CalibrationStore, CalibrationTimings, SensorIdentity};
use crate::constants::time::{MS_PER_HOUR, MS_PER_MINUTE};
use crate::poll::{OpenGate, PollLoop, ReadingGate};
use crate::reading::Reading;
use crate::time::{TimeSource, Timestamp};
use crate::traits::AirQualitySensor;

/// Whether readings are trustworthy yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationPhase {
    /// Readings are taken but not forwarded
    WarmingUp,
    /// Readings are forwarded; terminal for the process lifetime
    Logging,
}

/// How the warm-up window was chosen at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineSource {
    /// No usable stored baseline, the sensor calibrates from scratch
    ColdStart,
    /// A stored baseline was accepted by the sensor
    Restored,
}

/// Result of a checkpoint attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointOutcome {
    NotDue,
    Saved(Baseline),
    /// Logged; the next scheduled checkpoint tries again
    Failed,
}

/// Air-quality calibration state machine
#[derive(Debug)]
pub struct CalibrationGate {
    identity: Option<SensorIdentity>,
    store: CalibrationStore,
    timings: CalibrationTimings,
    phase: CalibrationPhase,
    source: BaselineSource,
    first_log_time: Timestamp,
    next_baseline_checkpoint: Timestamp,
    checkpoints_saved: u64,
}

impl CalibrationGate {
    /// Identify the sensor, restore its baseline if possible and open the
    /// warm-up window
    pub fn start<H: AirQualitySensor + ?Sized>(
        handle: &mut H,
        store: CalibrationStore,
        timings: CalibrationTimings,
        now: Timestamp,
    ) -> Self {
        let identity = match handle.serial() {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!("Calibration - Unable to read serial number: {}", e);
                None
            }
        };

        let stored = identity.as_ref().and_then(|identity| store.load(identity));
        let source = match stored {
            Some(baseline) => match handle.set_baseline(&baseline) {
                Ok(()) => {
                    info!(
                        "Calibration - Initialized baseline - eCO2:{} TVOC:{}",
                        baseline.baseline_primary, baseline.baseline_secondary
                    );
                    BaselineSource::Restored
                }
                Err(e) => {
                    warn!("Calibration - Attempted to write an invalid baseline: {}", e);
                    BaselineSource::ColdStart
                }
            },
            None => BaselineSource::ColdStart,
        };

        let warm_up_ms = match source {
            BaselineSource::ColdStart => timings.cold_start_warm_up_ms,
            BaselineSource::Restored => timings.restored_warm_up_ms,
        };
        info!("Calibration - Warming up for {}", describe_ms(warm_up_ms));

        Self {
            identity,
            store,
            timings,
            phase: CalibrationPhase::WarmingUp,
            source,
            first_log_time: now.saturating_add(warm_up_ms),
            next_baseline_checkpoint: now.saturating_add(timings.checkpoint_interval_ms),
            checkpoints_saved: 0,
        }
    }

    /// Record a successful reading; returns whether it may be forwarded
    pub fn observe(&mut self, now: Timestamp) -> bool {
        if self.phase == CalibrationPhase::WarmingUp {
            if now < self.first_log_time {
                return false;
            }
            self.phase = CalibrationPhase::Logging;
            info!("Calibration - Adjustment complete, beginning to log data");
        }
        true
    }

    /// Snapshot the sensor baseline into the store if a checkpoint is due
    ///
    /// Runs in both phases. The next checkpoint is scheduled one interval
    /// after `now` whether or not this one succeeds.
    pub fn checkpoint<H: AirQualitySensor + ?Sized>(
        &mut self,
        handle: &mut H,
        now: Timestamp,
    ) -> CheckpointOutcome {
        if now < self.next_baseline_checkpoint {
            return CheckpointOutcome::NotDue;
        }
        self.next_baseline_checkpoint = now.saturating_add(self.timings.checkpoint_interval_ms);

        let identity = match &self.identity {
            Some(identity) => identity.clone(),
            None => match handle.serial() {
                Ok(identity) => {
                    self.identity = Some(identity.clone());
                    identity
                }
                Err(e) => {
                    warn!("Calibration - Skipping baseline checkpoint, serial unknown: {}", e);
                    return CheckpointOutcome::Failed;
                }
            },
        };

        let baseline = match handle.baseline() {
            Ok(baseline) => baseline,
            Err(e) => {
                warn!("Calibration - Unable to read baseline: {}", e);
                return CheckpointOutcome::Failed;
            }
        };

        match self.store.save(&identity, &baseline) {
            Ok(()) => {
                self.checkpoints_saved += 1;
                CheckpointOutcome::Saved(baseline)
            }
            Err(e) => {
                warn!("Calibration - Baseline checkpoint failed: {}", e);
                CheckpointOutcome::Failed
            }
        }
    }

    pub fn phase(&self) -> CalibrationPhase {
        self.phase
    }

    pub fn source(&self) -> BaselineSource {
        self.source
    }

    pub fn identity(&self) -> Option<&SensorIdentity> {
        self.identity.as_ref()
    }

    pub fn first_log_time(&self) -> Timestamp {
        self.first_log_time
    }

    pub fn next_baseline_checkpoint(&self) -> Timestamp {
        self.next_baseline_checkpoint
    }

    pub fn checkpoints_saved(&self) -> u64 {
        self.checkpoints_saved
    }
}

impl<H: AirQualitySensor + ?Sized> ReadingGate<H> for CalibrationGate {
    fn on_cycle(&mut self, handle: &mut H, now: Timestamp) {
        self.checkpoint(handle, now);
    }

    fn admit(&mut self, _reading: &Reading, now: Timestamp) -> bool {
        self.observe(now)
    }
}

impl<H: AirQualitySensor, C: TimeSource> PollLoop<H, OpenGate, C> {
    /// Put this loop behind a calibration gate
    ///
    /// Talks to the sensor and reads the store immediately, so call it
    /// before the loop is handed to its thread.
    pub fn calibrated(
        self,
        store: CalibrationStore,
        timings: CalibrationTimings,
    ) -> PollLoop<H, CalibrationGate, C> {
        self.gated(|handle, now| CalibrationGate::start(handle, store, timings, now))
    }
}

fn describe_ms(ms: u64) -> String {
    if ms >= MS_PER_HOUR && ms % MS_PER_HOUR == 0 {
        format!("{} h", ms / MS_PER_HOUR)
    } else if ms >= MS_PER_MINUTE && ms % MS_PER_MINUTE == 0 {
        format!("{} min", ms / MS_PER_MINUTE)
    } else {
        format!("{} ms", ms)
    }
}
