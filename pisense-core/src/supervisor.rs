//! Loop supervision
//!
//! One OS thread per monitored sensor, for the lifetime of the process. The
//! supervisor only owns the join handles: it does no data handling and has no
//! restart policy. A loop that panics ends its own stream and nothing else;
//! the remaining loops keep running.

use std::any::Any;
use std::io;
use std::thread::{self, JoinHandle};

use log::{error, info};

use crate::poll::{PollLoop, ReadingGate};
use crate::time::TimeSource;
use crate::traits::SensorHandle;

/// Something the supervisor can run on its own thread
pub trait Monitor: Send + 'static {
    /// Thread and log name
    fn name(&self) -> &str;

    /// Run until the process exits
    fn run(self);
}

impl<H, G, C> Monitor for PollLoop<H, G, C>
where
    H: SensorHandle + 'static,
    G: ReadingGate<H> + 'static,
    C: TimeSource + 'static,
{
    fn name(&self) -> &str {
        PollLoop::name(self)
    }

    fn run(self) {
        self.run_forever()
    }
}

/// How a loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopExit {
    pub name: String,
    /// Panic message if the loop faulted
    pub fault: Option<String>,
}

struct Worker {
    name: String,
    handle: JoinHandle<()>,
}

/// Owns one thread per running monitor
#[derive(Default)]
pub struct Supervisor {
    workers: Vec<Worker>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a monitor on a new named thread
    pub fn spawn<M: Monitor>(&mut self, monitor: M) -> io::Result<()> {
        let name = monitor.name().to_owned();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || monitor.run())?;

        info!("Started monitor {}", name);
        self.workers.push(Worker { name, handle });
        Ok(())
    }

    /// Number of loops started
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.workers.iter().map(|w| w.name.as_str())
    }

    /// Loops whose thread has ended
    ///
    /// Monitors run forever, so anything listed here has faulted. The
    /// handles stay owned by the supervisor; nothing is restarted.
    pub fn finished(&self) -> Vec<&str> {
        self.workers
            .iter()
            .filter(|w| w.handle.is_finished())
            .map(|w| w.name.as_str())
            .collect()
    }

    /// Block until every loop has ended
    ///
    /// With healthy monitors this never returns.
    pub fn join(self) -> Vec<LoopExit> {
        self.workers
            .into_iter()
            .map(|worker| {
                let fault = worker.handle.join().err().map(|payload| panic_message(&*payload));
                if let Some(reason) = &fault {
                    error!("Monitor {} stopped: {}", worker.name, reason);
                }
                LoopExit { name: worker.name, fault }
            })
            .collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Once {
        name: &'static str,
        panic: bool,
    }

    impl Monitor for Once {
        fn name(&self) -> &str {
            self.name
        }

        fn run(self) {
            if self.panic {
                panic!("i2c bus gone");
            }
        }
    }

    #[test]
    fn join_reports_faults_per_loop() {
        let mut supervisor = Supervisor::new();
        supervisor.spawn(Once { name: "pm25", panic: false }).unwrap();
        supervisor.spawn(Once { name: "sgp30", panic: true }).unwrap();

        assert_eq!(supervisor.len(), 2);
        assert_eq!(supervisor.names().collect::<Vec<_>>(), ["pm25", "sgp30"]);

        let exits = supervisor.join();
        assert_eq!(exits[0], LoopExit { name: "pm25".into(), fault: None });
        assert_eq!(
            exits[1],
            LoopExit { name: "sgp30".into(), fault: Some("i2c bus gone".into()) }
        );
    }

    #[test]
    fn threads_carry_monitor_names() {
        struct NameCheck;

        impl Monitor for NameCheck {
            fn name(&self) -> &str {
                "bme280"
            }

            fn run(self) {
                assert_eq!(thread::current().name(), Some("bme280"));
            }
        }

        let mut supervisor = Supervisor::new();
        supervisor.spawn(NameCheck).unwrap();
        assert!(supervisor.join().iter().all(|exit| exit.fault.is_none()));
    }
}
