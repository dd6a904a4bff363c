//! Scan debouncer
//!
//! Suppresses repeated scans of the same product inside a cooldown window.
//! Only accepted scans are recorded, so a stream of rejected duplicates does
//! not keep extending the window.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::types::Product;

/// Default cooldown between two accepted scans of the same product
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone)]
pub struct ScanDebouncer {
    cooldown: Duration,
    last_accepted: HashMap<String, Instant>,
}

impl Default for ScanDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl ScanDebouncer {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_accepted: HashMap::new(),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Accept `product` at `now` unless it was accepted less than one cooldown ago.
    ///
    /// The timestamp is recorded before returning, so a re-delivered copy of
    /// the same scan in the same tick is rejected.
    pub fn accept(&mut self, product: &Product, now: Instant) -> bool {
        if let Some(last) = self.last_accepted.get(&product.name) {
            // saturating: an out-of-order `now` earlier than the record counts as zero elapsed
            if now.saturating_duration_since(*last) < self.cooldown {
                log::debug!(
                    "Ignoring '{}': scanned {:?} ago (cooldown {:?})",
                    product.name,
                    now.saturating_duration_since(*last),
                    self.cooldown
                );
                return false;
            }
        }
        self.last_accepted.insert(product.name.clone(), now);
        true
    }

    /// Forget every recorded scan
    pub fn clear(&mut self) {
        log::trace!("Clearing {} debounce entries", self.last_accepted.len());
        self.last_accepted.clear();
    }

    pub fn last_accepted(&self, name: &str) -> Option<Instant> {
        self.last_accepted.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.last_accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_accepted.is_empty()
    }
}
