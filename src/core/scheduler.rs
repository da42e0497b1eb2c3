//! Timer-driven tick loop

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::ScheduleConfig;
use crate::core::relay::Relay;

/// Runs [`Relay::run_tick`] on a fixed interval until told to stop.
///
/// A tick that overruns the interval delays the next one instead of
/// triggering a burst of catch-up ticks.
pub struct Scheduler {
    relay: Relay,
    interval: Duration,
    run_on_start: bool,
}

impl Scheduler {
    pub fn new(relay: Relay, config: &ScheduleConfig) -> Self {
        Self {
            relay,
            interval: config.interval(),
            run_on_start: config.run_on_start,
        }
    }

    /// Loop until `shutdown` turns true or its sender is dropped.
    ///
    /// A tick in flight always completes. Returns the number of ticks run.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let start = if self.run_on_start {
            Instant::now()
        } else {
            Instant::now() + self.interval
        };
        let mut interval = tokio::time::interval_at(start, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Scheduler started: every {:?}, run_on_start={}",
            self.interval, self.run_on_start
        );

        let mut ticks = 0u64;
        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = interval.tick() => {
                    ticks += 1;
                    debug!("Tick {} starting", ticks);
                    self.relay.run_tick().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Scheduler stopped after {} tick(s)", ticks);
        ticks
    }
}
