//! Scan poller
//!
//! Asks the backend for a pending scan once per interval and forwards
//! whatever it gets to the controller queue. Stopping only takes effect
//! between polls: the backend hands a scan out once, so a request already
//! on the wire is allowed to finish and its scan is still delivered.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::commands::Command;
use crate::backend::ScanBackend;

pub struct ScanPoller {
    backend: Arc<dyn ScanBackend>,
    period: Duration,
    commands: WeakUnboundedSender<Command>,
}

/// A running poller. Dropping the handle also stops it.
pub struct PollerHandle {
    stop_tx: watch::Sender<bool>,
}

impl PollerHandle {
    /// Ask the poller to stop before its next tick
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }
}

impl ScanPoller {
    pub fn new(
        backend: Arc<dyn ScanBackend>,
        period: Duration,
        commands: WeakUnboundedSender<Command>,
    ) -> Self {
        Self {
            backend,
            period,
            commands,
        }
    }

    pub fn spawn(self) -> PollerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        tokio::spawn(self.run(stop_rx));
        PollerHandle { stop_tx }
    }

    async fn run(self, mut stop_rx: watch::Receiver<bool>) {
        // First poll one full period after start
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        log::debug!("Scan poller started (every {:?})", self.period);

        loop {
            tokio::select! {
                biased;
                // A closed channel means the handle is gone
                _ = stop_rx.changed() => {
                    log::debug!("Scan poller stopped");
                    return;
                }
                _ = ticker.tick() => {}
            }

            match self.backend.poll_scan().await {
                Ok(Some(payload)) => {
                    log::debug!("Poll returned {:?}", payload);
                    let delivered = self
                        .commands
                        .upgrade()
                        .map(|tx| tx.send(Command::Scan(payload)).is_ok())
                        .unwrap_or(false);
                    if !delivered {
                        log::debug!("Controller gone; scan poller exiting");
                        return;
                    }
                }
                Ok(None) => log::trace!("No product detected yet"),
                Err(e) => log::warn!("Error fetching product details: {}", e),
            }
        }
    }
}
