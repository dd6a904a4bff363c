//! Application state owned by the kiosk controller
//!
//! Everything the shopper sees lives here: cart, mode, debounce record,
//! recommendations on display, the notification board and whether
//! scanning is active. Only the controller task holds an `AppState`, so
//! none of it is behind a lock.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cart::{
    Cart, CartLine, CartReconciler, Mode, ModeController, RecommendationSet, RecommendationTable,
    ScanDebouncer, ScanError, ScanOutcome, ScanPayload, ScanResult, DEFAULT_COOLDOWN,
};
use crate::notifications::api::{ExpiryPolicy, NotificationBoard, DEFAULT_NOTIFICATION_TTL};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3_000);
pub const BILL_FILE_NAME: &str = "NexCart_Bill.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanningState {
    #[default]
    Idle,
    Active,
}

/// Tunables for one kiosk session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cooldown: Duration,
    pub notification_ttl: Duration,
    pub expiry_policy: ExpiryPolicy,
    pub poll_interval: Duration,
    pub bill_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            expiry_policy: ExpiryPolicy::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            bill_dir: PathBuf::from("."),
        }
    }
}

impl SessionConfig {
    pub fn bill_path(&self) -> PathBuf {
        self.bill_dir.join(BILL_FILE_NAME)
    }
}

/// Result of an accepted scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub outcome: ScanOutcome,
    pub notification: String,
    pub recommendations_changed: bool,
}

impl ScanReport {
    pub fn cart_changed(&self) -> bool {
        !matches!(self.outcome, ScanOutcome::RemoveMiss)
    }
}

/// Read-only copy of the session for display and tests
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub lines: Vec<CartLine>,
    pub total: f64,
    pub mode: Mode,
    pub scanning: ScanningState,
    pub recommendations: RecommendationSet,
    pub notification: Option<String>,
}

#[derive(Debug)]
pub struct AppState {
    pub(crate) mode: ModeController,
    pub(crate) debouncer: ScanDebouncer,
    pub(crate) reconciler: CartReconciler,
    pub(crate) recommendations: RecommendationSet,
    pub(crate) board: NotificationBoard,
    pub(crate) scanning: ScanningState,
}

impl AppState {
    pub fn new(config: &SessionConfig, table: Arc<RecommendationTable>) -> Self {
        Self {
            mode: ModeController::default(),
            debouncer: ScanDebouncer::new(config.cooldown),
            reconciler: CartReconciler::new(table),
            recommendations: RecommendationSet::new(),
            board: NotificationBoard::new(config.notification_ttl, config.expiry_policy),
            scanning: ScanningState::Idle,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode.current_mode()
    }

    pub fn cart(&self) -> &Cart {
        self.reconciler.cart()
    }

    pub fn total(&self) -> f64 {
        self.reconciler.total()
    }

    pub fn recommendations(&self) -> &RecommendationSet {
        &self.recommendations
    }

    pub fn scanning(&self) -> ScanningState {
        self.scanning
    }

    pub fn notification(&self) -> Option<&str> {
        self.board.message()
    }

    pub fn board_mut(&mut self) -> &mut NotificationBoard {
        &mut self.board
    }

    /// Validate, debounce and reconcile one scan.
    ///
    /// `InvalidScan` and `DuplicateScan` leave every piece of state untouched.
    pub fn apply_scan(&mut self, payload: ScanPayload, now: Instant) -> ScanResult<ScanReport> {
        let product = payload.validate()?;

        if !self.debouncer.accept(&product, now) {
            return Err(ScanError::DuplicateScan { name: product.name });
        }

        let reconciliation = self.reconciler.reconcile(&product, self.mode.current_mode());
        let before = self.recommendations.clone();
        reconciliation
            .recommendation_action
            .apply(&mut self.recommendations);

        Ok(ScanReport {
            outcome: reconciliation.outcome,
            notification: reconciliation.notification,
            recommendations_changed: before != self.recommendations,
        })
    }

    /// Toggle the mode and reset the debounce record
    pub fn switch_mode(&mut self) -> Mode {
        self.mode.switch_mode(&mut self.debouncer)
    }

    /// Reset cart and recommendations after a successful checkout
    pub fn complete_checkout(&mut self) {
        self.reconciler.clear();
        self.recommendations.clear();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            lines: self.cart().lines().to_vec(),
            total: self.total(),
            mode: self.mode(),
            scanning: self.scanning,
            recommendations: self.recommendations.clone(),
            notification: self.notification().map(str::to_string),
        }
    }
}
