//! Scan-event reconciliation engine
//!
//! Debounce, mode handling, cart arithmetic and recommendation lookup. Pure
//! state with no I/O; the session controller drives it.

pub mod debounce;
pub mod error;
pub mod mode;
pub mod reconciler;
pub mod recommendations;
pub mod scan;
pub mod types;

pub use debounce::{ScanDebouncer, DEFAULT_COOLDOWN};
pub use error::{ScanError, ScanResult, TableError};
pub use mode::ModeController;
pub use reconciler::{CartReconciler, Reconciliation, RecommendationAction, ScanOutcome};
pub use recommendations::{RecommendationEntry, RecommendationSet, RecommendationTable};
pub use scan::ScanPayload;
pub use types::{Cart, CartLine, Mode, Product};
