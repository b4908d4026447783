//! Integration tests for loop isolation under the supervisor

mod common;

use std::thread;
use std::time::{Duration, Instant};

use pisense_core::{
    errors::SensorError,
    poll::PollLoop,
    reading::{Reading, SensorKind},
    supervisor::Supervisor,
    traits::SensorHandle,
};

use common::{pm25, RecordingSink, ScriptedSensor};

/// Particulate sensor whose PM2.5 value climbs on every read
struct Climbing(u16);

impl SensorHandle for Climbing {
    fn kind(&self) -> SensorKind {
        SensorKind::Particulate
    }

    fn read(&mut self) -> Result<Reading, SensorError> {
        self.0 = self.0.wrapping_add(1);
        Ok(pm25(self.0))
    }
}

/// Driver bug: panics on the first read
struct Faulty;

impl SensorHandle for Faulty {
    fn kind(&self) -> SensorKind {
        SensorKind::Climate
    }

    fn read(&mut self) -> Result<Reading, SensorError> {
        panic!("i2c bus wedged");
    }
}

fn wait_for(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    done()
}

#[test]
fn faulty_loop_does_not_stop_healthy_loop() {
    let healthy_sink = RecordingSink::new();
    let faulty_sink = RecordingSink::new();

    let mut supervisor = Supervisor::new();
    supervisor
        .spawn(
            PollLoop::new("pm25", Climbing(0), healthy_sink.clone())
                .with_interval(Duration::from_millis(1)),
        )
        .unwrap();
    supervisor
        .spawn(
            PollLoop::new("bme280", Faulty, faulty_sink.clone())
                .with_interval(Duration::from_millis(1)),
        )
        .unwrap();

    assert!(wait_for(Duration::from_secs(5), || supervisor.finished() == ["bme280"]));

    let before = healthy_sink.batch_count();
    assert!(wait_for(Duration::from_secs(5), || healthy_sink.batch_count() > before + 3));

    assert_eq!(supervisor.finished(), ["bme280"]);
    assert_eq!(faulty_sink.batch_count(), 0);
}

#[test]
fn read_failures_keep_loop_alive() {
    let sink = RecordingSink::new();
    let script = vec![
        Err(SensorError::Frame("checksum mismatch".into())),
        Ok(pm25(12)),
        Err(SensorError::NotReady),
        Ok(pm25(12)),
        Ok(pm25(13)),
    ];

    let mut supervisor = Supervisor::new();
    supervisor
        .spawn(
            PollLoop::new("pm25", ScriptedSensor::new(SensorKind::Particulate, script), sink.clone())
                .with_interval(Duration::from_millis(1)),
        )
        .unwrap();

    // 12 once, 13 once; the script then reports NotReady forever
    assert!(wait_for(Duration::from_secs(5), || sink.batch_count() == 2));
    thread::sleep(Duration::from_millis(50));

    assert_eq!(sink.batch_count(), 2);
    assert!(supervisor.finished().is_empty());
}
