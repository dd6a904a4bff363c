//! Scripted vision backend

use async_trait::async_trait;
use nexcart::backend::{BackendError, BackendResult, ScanBackend};
use nexcart::cart::{Mode, ScanPayload};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub const BILL: &[u8] = b"Product Name\tPrice\tQuantity\nBread\t2.50\t2\n";

#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<String>>,
    pending: Mutex<VecDeque<ScanPayload>>,
    pub fail_checkout: AtomicBool,
}

impl ScriptedBackend {
    pub fn queue_scan(&self, name: &str, price: f64) {
        self.pending
            .lock()
            .unwrap()
            .push_back(ScanPayload::new(name, price));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ScanBackend for ScriptedBackend {
    async fn start_scanning(&self) -> BackendResult<()> {
        self.record("start".to_string());
        // The real backend only answers once its detection loop ends
        std::future::pending::<()>().await;
        Ok(())
    }

    async fn stop_scanning(&self) -> BackendResult<()> {
        self.record("stop".to_string());
        Ok(())
    }

    async fn poll_scan(&self) -> BackendResult<Option<ScanPayload>> {
        Ok(self.pending.lock().unwrap().pop_front())
    }

    async fn set_mode(&self, mode: Mode) -> BackendResult<()> {
        self.record(format!("mode:{}", mode));
        Ok(())
    }

    async fn checkout(&self) -> BackendResult<Vec<u8>> {
        self.record("checkout".to_string());
        if self.fail_checkout.load(Ordering::SeqCst) {
            return Err(BackendError::Status {
                operation: "checkout".to_string(),
                status: 503,
            });
        }
        Ok(BILL.to_vec())
    }
}
