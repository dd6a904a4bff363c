//! Kiosk shutdown coordination
//!
//! Signals (Ctrl-C, SIGTERM, SIGHUP) and the console `quit` command both end
//! up as a single broadcast that the console loop and the display task
//! select on. A second signal exits immediately.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Exit status used when a second signal forces the process down
pub const FORCED_EXIT_CODE: i32 = 130;

#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
    shutdown_requested: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(4);
        let coordinator = Self {
            shutdown_tx,
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        };
        (coordinator, shutdown_rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::Release);
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Spawn one listener per termination signal; must run inside a runtime
    pub fn install_signal_handlers(&self) {
        let signal_count = Arc::new(AtomicUsize::new(0));

        #[cfg(unix)]
        {
            // Restore default SIGPIPE so a closed stdout pipe ends the process quietly
            unsafe {
                libc::signal(libc::SIGPIPE, libc::SIG_DFL);
            }

            use tokio::signal::unix::{signal, SignalKind};
            for kind in [SignalKind::terminate(), SignalKind::hangup()] {
                let coordinator = self.clone();
                let counter = signal_count.clone();
                tokio::spawn(async move {
                    if let Ok(mut sig) = signal(kind) {
                        while sig.recv().await.is_some() {
                            coordinator.on_signal(&counter, "termination signal");
                        }
                    }
                });
            }
        }

        let coordinator = self.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                coordinator.on_signal(&signal_count, "Ctrl-C");
            }
        });
    }

    fn on_signal(&self, counter: &AtomicUsize, source: &str) {
        let previous = counter.fetch_add(1, Ordering::AcqRel);
        if previous >= 1 {
            log::warn!("{} received again; exiting", source);
            std::process::exit(FORCED_EXIT_CODE);
        }
        log::info!("{} received; shutting down", source);
        self.trigger_shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let (coordinator, mut console_rx) = ShutdownCoordinator::new();
        let mut display_rx = coordinator.subscribe();
        assert!(!coordinator.is_shutdown_requested());

        coordinator.trigger_shutdown();

        assert!(coordinator.is_shutdown_requested());
        assert!(timeout(Duration::from_millis(100), console_rx.recv())
            .await
            .is_ok());
        assert!(timeout(Duration::from_millis(100), display_rx.recv())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let (coordinator, _rx) = ShutdownCoordinator::new();
        let console_side = coordinator.clone();

        console_side.trigger_shutdown();

        assert!(coordinator.is_shutdown_requested());
    }

    #[tokio::test]
    async fn test_first_signal_only_requests_shutdown() {
        let (coordinator, mut rx) = ShutdownCoordinator::new();
        let counter = AtomicUsize::new(0);

        coordinator.on_signal(&counter, "Ctrl-C");

        assert!(coordinator.is_shutdown_requested());
        assert!(rx.try_recv().is_ok());
    }
}
