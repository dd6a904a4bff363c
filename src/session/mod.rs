//! Kiosk session: the controller task that owns all shopper-visible state,
//! the scan poller, and the handle the operator console drives it with.

pub mod commands;
pub mod controller;
pub mod error;
pub mod poller;
pub mod state;

pub use commands::{Command, KioskHandle};
pub use controller::{save_bill, KioskController};
pub use error::{SessionError, SessionResult};
pub use state::{
    AppState, ScanReport, ScanningState, SessionConfig, SessionSnapshot, BILL_FILE_NAME,
    DEFAULT_POLL_INTERVAL,
};
