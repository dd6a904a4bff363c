//! Kiosk controller
//!
//! A single task owns the [`AppState`] and drains one command queue, so
//! scans, operator actions, timer expiries and network completions are
//! handled strictly one after another. Handlers never await the network:
//! backend calls run as spawned side tasks and report back through the
//! same queue when their result matters.

use std::future::Future;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, WeakUnboundedSender};
use tokio::task::JoinHandle;

use super::commands::{Command, KioskHandle};
use super::error::{SessionError, SessionResult};
use super::poller::{PollerHandle, ScanPoller};
use super::state::{AppState, ScanningState, SessionConfig};
use crate::backend::{BackendError, BackendResult, ScanBackend};
use crate::cart::{RecommendationTable, ScanError, ScanPayload};
use crate::core::error_handling::log_error_with_context;
use crate::core::time::TimeProvider;
use crate::notifications::api::{AsyncNotificationManager, CartSnapshot, KioskEvent, KioskEventType};

pub struct KioskController {
    state: AppState,
    config: SessionConfig,
    backend: Arc<dyn ScanBackend>,
    events: AsyncNotificationManager,
    clock: Arc<dyn TimeProvider>,
    commands: WeakUnboundedSender<Command>,
    receiver: UnboundedReceiver<Command>,
    poller: Option<PollerHandle>,
    start_attempt: u64,
    checkout_in_flight: bool,
}

impl KioskController {
    /// Build a controller and the handle used to drive it.
    ///
    /// The controller only keeps a weak sender, so it stops once every
    /// `KioskHandle` has been dropped or `Shutdown` is sent.
    pub fn new(
        config: SessionConfig,
        table: Arc<RecommendationTable>,
        backend: Arc<dyn ScanBackend>,
        events: AsyncNotificationManager,
        clock: Arc<dyn TimeProvider>,
    ) -> (Self, KioskHandle) {
        let (tx, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            state: AppState::new(&config, table),
            config,
            backend,
            events,
            clock,
            commands: tx.downgrade(),
            receiver,
            poller: None,
            start_attempt: 0,
            checkout_in_flight: false,
        };
        (controller, KioskHandle::new(tx))
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        log::debug!("Kiosk controller running");
        while let Some(command) = self.receiver.recv().await {
            if self.handle(command).is_break() {
                break;
            }
        }
        self.stop_poller();
        log::debug!("Kiosk controller stopped");
    }

    fn handle(&mut self, command: Command) -> ControlFlow<()> {
        log::trace!("Handling {:?}", command);
        match command {
            Command::StartScanning => self.start_scanning(),
            Command::StopScanning => self.stop_scanning(),
            Command::ToggleMode => self.toggle_mode(),
            Command::Checkout => self.checkout(),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.state.snapshot());
            }
            Command::Shutdown => {
                self.stop_poller();
                self.emit(KioskEventType::Shutdown);
                return ControlFlow::Break(());
            }
            Command::Scan(payload) => self.scan(payload),
            Command::ExpireNotification(generation) => {
                if let Some(cleared) = self.state.board_mut().expire(generation) {
                    self.emit(KioskEventType::NotificationCleared {
                        generation: cleared,
                    });
                }
            }
            Command::StartFailed { attempt, error } => self.start_failed(attempt, error),
            Command::CheckoutFinished(result) => self.checkout_finished(result),
        }
        ControlFlow::Continue(())
    }

    fn scan(&mut self, payload: ScanPayload) {
        let now = self.clock.now();
        match self.state.apply_scan(payload, now) {
            Ok(report) => {
                if report.cart_changed() {
                    self.emit_cart();
                }
                if report.recommendations_changed {
                    self.emit(KioskEventType::RecommendationsChanged(
                        self.state.recommendations().clone(),
                    ));
                }
                self.notify(report.notification);
            }
            Err(ScanError::InvalidScan { reason }) => {
                log::error!("Invalid product data: {}", reason);
            }
            Err(ScanError::DuplicateScan { name }) => {
                log::debug!("'{}' scanned within cooldown. Ignoring...", name);
            }
        }
    }

    fn start_scanning(&mut self) {
        if self.state.scanning() == ScanningState::Active {
            log::debug!("Start requested while already scanning");
            return;
        }

        self.start_attempt += 1;
        let attempt = self.start_attempt;
        self.activate();

        // The backend only answers once its detection loop ends, so a
        // successful reply is informational and only a failure comes back.
        let backend = self.backend.clone();
        let commands = self.commands.clone();
        tokio::spawn(async move {
            match backend.start_scanning().await {
                Ok(()) => log::info!("Video feed ended on the backend"),
                Err(error) => {
                    if let Some(tx) = commands.upgrade() {
                        let _ = tx.send(Command::StartFailed { attempt, error });
                    }
                }
            }
        });
    }

    fn start_failed(&mut self, attempt: u64, error: BackendError) {
        log::error!("Error starting video feed: {}", error);
        // A later start/stop supersedes this attempt
        if attempt == self.start_attempt && self.state.scanning() == ScanningState::Active {
            self.deactivate();
        }
    }

    fn stop_scanning(&mut self) {
        if self.state.scanning() == ScanningState::Idle {
            log::debug!("Stop requested while not scanning");
            return;
        }
        self.deactivate();

        let backend = self.backend.clone();
        fire_and_forget("stop video feed", async move { backend.stop_scanning().await });
        self.notify("Scanning stopped.".to_string());
    }

    fn toggle_mode(&mut self) {
        let mode = self.state.switch_mode();
        self.emit(KioskEventType::ModeChanged(mode));

        let backend = self.backend.clone();
        fire_and_forget("set mode", async move { backend.set_mode(mode).await });
    }

    fn checkout(&mut self) {
        if self.checkout_in_flight {
            log::warn!("Checkout already in progress");
            return;
        }
        if self.state.cart().is_empty() {
            log::info!("Checkout requested with an empty cart. Ignoring...");
            return;
        }
        // Scanning stops whether or not the checkout succeeds
        if self.state.scanning() == ScanningState::Active {
            self.deactivate();
        }
        self.checkout_in_flight = true;

        let backend = self.backend.clone();
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let result = backend.checkout().await;
            if let Some(tx) = commands.upgrade() {
                let _ = tx.send(Command::CheckoutFinished(result));
            }
        });
    }

    fn checkout_finished(&mut self, result: BackendResult<Vec<u8>>) {
        self.checkout_in_flight = false;
        let bill = match result {
            Ok(bill) => bill,
            Err(e) => {
                log::error!("Error during checkout: {}", e);
                return;
            }
        };

        log::info!(
            "Checkout completed: {} items, total ${:.2}",
            self.state.cart().item_count(),
            self.state.total()
        );
        self.state.complete_checkout();
        self.emit_cart();
        self.emit(KioskEventType::RecommendationsChanged(Vec::new()));
        self.notify("Checkout completed!".to_string());

        let path = self.config.bill_path();
        tokio::spawn(async move {
            match save_bill(&path, &bill).await {
                Ok(path) => log::info!("Bill saved to {}", path.display()),
                Err(e) => log_error_with_context(&e, "Saving bill"),
            }
        });
    }

    fn activate(&mut self) {
        self.state.scanning = ScanningState::Active;
        let poller = ScanPoller::new(
            self.backend.clone(),
            self.config.poll_interval,
            self.commands.clone(),
        );
        self.poller = Some(poller.spawn());
        self.emit(KioskEventType::ScanningChanged(ScanningState::Active));
    }

    fn deactivate(&mut self) {
        self.stop_poller();
        self.state.scanning = ScanningState::Idle;
        self.emit(KioskEventType::ScanningChanged(ScanningState::Idle));
    }

    /// Stop polling. A poll already waiting on the backend still delivers
    /// its scan, which is then handled like any other.
    fn stop_poller(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }

    /// Show `message` and schedule its expiry. Earlier expiries stay scheduled.
    fn notify(&mut self, message: String) {
        let generation = self.state.board_mut().publish(message.clone());
        self.emit(KioskEventType::NotificationShown {
            message,
            generation,
        });

        let ttl = self.state.board_mut().ttl();
        let commands = self.commands.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(tx) = commands.upgrade() {
                let _ = tx.send(Command::ExpireNotification(generation));
            }
        });
    }

    fn emit_cart(&mut self) {
        let snapshot = CartSnapshot::from(self.state.cart());
        self.emit(KioskEventType::CartChanged(snapshot));
    }

    fn emit(&mut self, event_type: KioskEventType) {
        if let Err(e) = self.events.publish(KioskEvent::new(event_type)) {
            log::debug!("{}", e);
        }
    }
}

/// Run a best-effort backend call; failures are logged and otherwise ignored
fn fire_and_forget<F>(operation: &'static str, call: F)
where
    F: Future<Output = BackendResult<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = call.await {
            log::error!("Failed to {}: {}", operation, e);
        }
    });
}

/// Write the bill returned by checkout, creating the directory if needed
pub async fn save_bill(path: &Path, bill: &[u8]) -> SessionResult<PathBuf> {
    let write_error = |source| SessionError::BillWrite {
        path: path.display().to_string(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await.map_err(write_error)?;
    }
    tokio::fs::write(path, bill).await.map_err(write_error)?;
    Ok(path.to_path_buf())
}
