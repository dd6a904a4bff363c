//! Commands accepted by the kiosk controller and the handle used to send them

use tokio::sync::{mpsc, oneshot};

use super::error::{SessionError, SessionResult};
use super::state::SessionSnapshot;
use crate::backend::{BackendError, BackendResult};
use crate::cart::ScanPayload;

/// Everything that can happen to a session, processed one at a time in arrival order
#[derive(Debug)]
pub enum Command {
    // Operator actions
    StartScanning,
    StopScanning,
    ToggleMode,
    Checkout,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,

    // Event sources
    Scan(ScanPayload),
    ExpireNotification(u64),

    // Completions of spawned backend calls
    StartFailed { attempt: u64, error: BackendError },
    CheckoutFinished(BackendResult<Vec<u8>>),
}

/// Cloneable sender side of the controller's command queue
#[derive(Debug, Clone)]
pub struct KioskHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl KioskHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Command>) -> Self {
        Self { tx }
    }

    pub fn send(&self, command: Command) -> SessionResult<()> {
        self.tx
            .send(command)
            .map_err(|_| SessionError::ControllerClosed)
    }

    pub fn start_scanning(&self) -> SessionResult<()> {
        self.send(Command::StartScanning)
    }

    pub fn stop_scanning(&self) -> SessionResult<()> {
        self.send(Command::StopScanning)
    }

    pub fn toggle_mode(&self) -> SessionResult<()> {
        self.send(Command::ToggleMode)
    }

    pub fn checkout(&self) -> SessionResult<()> {
        self.send(Command::Checkout)
    }

    /// Inject a scan as if it had come from the poller
    pub fn submit_scan(&self, payload: ScanPayload) -> SessionResult<()> {
        self.send(Command::Scan(payload))
    }

    pub fn shutdown(&self) -> SessionResult<()> {
        self.send(Command::Shutdown)
    }

    /// Current session state, after every previously sent command has been handled
    pub async fn snapshot(&self) -> SessionResult<SessionSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Snapshot(reply_tx))?;
        reply_rx.await.map_err(|_| SessionError::ControllerClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
