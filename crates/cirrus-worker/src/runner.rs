//! Janitor runner: interval loop with explicit cancellation.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;
use tracing::info;

use crate::sweep::RetentionSweep;

/// Drives the retention sweep on a fixed interval until cancelled.
#[derive(Debug)]
pub struct JanitorRunner {
    /// The sweep to run.
    sweep: Arc<RetentionSweep>,
}

impl JanitorRunner {
    /// Creates a new janitor runner.
    pub fn new(sweep: Arc<RetentionSweep>) -> Self {
        Self { sweep }
    }

    /// Run sweeps until the cancel signal flips to `true`.
    ///
    /// The first sweep runs one full interval after start, matching the
    /// daily-schedule behavior. Each tick runs both passes to completion;
    /// cancellation is observed between ticks.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        if !self.sweep.enabled() {
            info!("Janitor disabled by configuration");
            return;
        }

        let period = self.sweep.interval();
        info!(interval_seconds = period.as_secs(), "Janitor started");

        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
        // The first tick of tokio's interval fires immediately; consume it
        // so sweeps start one full period after boot.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        info!("Janitor received shutdown signal");
                        break;
                    }
                }
                _ = interval.tick() => {
                    self.sweep.run_once(Utc::now()).await;
                }
            }
        }

        info!("Janitor shut down");
    }
}
