//! Boundary between the kiosk controller and the vision backend

use async_trait::async_trait;

use super::error::BackendResult;
use crate::cart::{Mode, ScanPayload};

/// Calls the controller makes against the vision backend.
///
/// None of these are allowed to gate local state except `start_scanning`;
/// callers log failures and move on.
#[async_trait]
pub trait ScanBackend: Send + Sync {
    /// Ask the backend to start its detection loop
    async fn start_scanning(&self) -> BackendResult<()>;

    /// Ask the backend to stop its detection loop
    async fn stop_scanning(&self) -> BackendResult<()>;

    /// Fetch the pending scan, if any. `Ok(None)` means nothing is pending.
    async fn poll_scan(&self) -> BackendResult<Option<ScanPayload>>;

    /// Tell the backend which mode the operator selected
    async fn set_mode(&self, mode: Mode) -> BackendResult<()>;

    /// Close the cart on the backend and return the bill contents
    async fn checkout(&self) -> BackendResult<Vec<u8>>;
}
