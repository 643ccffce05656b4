//! Tick Scheduler
//!
//! The scheduler is a dedicated OS thread running a single-threaded tokio
//! runtime. It waits on a fixed interval and runs one simulation tick per
//! interval until it is cancelled.
//!
//! # Cancellation
//!
//! Cancellation is cooperative. The flag is checked before every wait, and
//! the wait itself races the interval against the cancellation channel, so a
//! cancelled scheduler exits without waiting out a full interval. A tick that
//! has already started always runs to completion.
//!
//! # Failures
//!
//! A rejected or panicking tick is logged and the loop carries on with the
//! next interval. The node set is left as it was before the failed tick.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

use super::simulation::Simulation;
use crate::config::EngineConfig;
use crate::error::{LayoutError, Result};

/// Handle to the background tick loop.
pub(crate) struct Scheduler {
    cancel: watch::Sender<bool>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    /// Start ticking `simulation` on a new thread.
    pub(crate) fn spawn(simulation: Arc<Simulation>, config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let period = config.tick_interval();
        let (cancel, cancelled) = watch::channel(false);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| LayoutError::Scheduler(e.to_string()))?;

        let thread = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || runtime.block_on(run(simulation, period, cancelled)))
            .map_err(|e| LayoutError::Scheduler(e.to_string()))?;

        Ok(Self {
            cancel,
            thread: Mutex::new(Some(thread)),
        })
    }

    /// Ask the loop to exit and wait for it.
    ///
    /// When called from the scheduler thread itself (an observer disposing
    /// the engine) the thread is detached instead; it exits once the current
    /// tick returns.
    pub(crate) fn stop(&self) {
        self.cancel.send_replace(true);

        let Some(thread) = self.thread.lock().take() else {
            return;
        };
        if thread.thread().id() == thread::current().id() {
            return;
        }
        if thread.join().is_err() {
            warn!("scheduler thread panicked before shutdown");
        }
    }
}

async fn run(simulation: Arc<Simulation>, period: Duration, mut cancelled: watch::Receiver<bool>) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of an interval completes immediately
    ticker.tick().await;

    info!(period_ms = period.as_millis() as u64, "layout scheduler started");

    loop {
        if *cancelled.borrow() {
            break;
        }

        tokio::select! {
            biased;
            changed = cancelled.changed() => {
                if changed.is_err() || *cancelled.borrow() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        match panic::catch_unwind(AssertUnwindSafe(|| simulation.step())) {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => {
                error!(error = %err, tick = simulation.tick_count() + 1, "layout tick rejected");
            }
            Err(_) => {
                error!(tick = simulation.tick_count() + 1, "layout tick panicked");
            }
        }
    }

    info!(ticks = simulation.tick_count(), "layout scheduler stopped");
}
