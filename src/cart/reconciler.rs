//! Cart reconciler
//!
//! Applies an accepted scan to the cart under the current mode and reports
//! the user-facing message and the recommendation change that go with it.
//! Reconciliation never fails: inputs have been validated and debounced
//! before they get here.

use std::sync::Arc;

use super::recommendations::{RecommendationSet, RecommendationTable};
use super::types::{Cart, Mode, Product};

/// What the scan did to the cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Line created or incremented; carries the new quantity
    Added { quantity: u32 },
    /// Line decremented (or dropped when `remaining` is 0)
    Removed { remaining: u32 },
    /// Remove requested for a product that is not in the cart
    RemoveMiss,
}

/// How the displayed recommendations change after a scan
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationAction {
    Replace(RecommendationSet),
    Keep,
    Clear,
}

impl RecommendationAction {
    /// Apply this action to the set currently on display
    pub fn apply(self, current: &mut RecommendationSet) {
        match self {
            RecommendationAction::Replace(set) => *current = set,
            RecommendationAction::Keep => {}
            RecommendationAction::Clear => current.clear(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub outcome: ScanOutcome,
    pub notification: String,
    pub recommendation_action: RecommendationAction,
}

/// Owns the cart and the recommendation table
#[derive(Debug, Clone)]
pub struct CartReconciler {
    cart: Cart,
    table: Arc<RecommendationTable>,
}

impl CartReconciler {
    pub fn new(table: Arc<RecommendationTable>) -> Self {
        Self {
            cart: Cart::new(),
            table,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn table(&self) -> &RecommendationTable {
        &self.table
    }

    pub fn total(&self) -> f64 {
        self.cart.total()
    }

    /// Empty the cart (successful checkout)
    pub fn clear(&mut self) {
        self.cart.clear();
    }

    pub fn reconcile(&mut self, product: &Product, mode: Mode) -> Reconciliation {
        match mode {
            Mode::Add => {
                let quantity = self.cart.add(product);
                log::info!("Added: {} (${:.2}), quantity {}", product.name, product.price, quantity);

                let recommendation_action = match self.table.lookup(&product.name) {
                    Some(set) => RecommendationAction::Replace(set.clone()),
                    // A miss leaves whatever is on display
                    None => RecommendationAction::Keep,
                };

                Reconciliation {
                    outcome: ScanOutcome::Added { quantity },
                    notification: format!("Added {} to cart", product.name),
                    recommendation_action,
                }
            }
            Mode::Remove => {
                let (outcome, notification) = match self.cart.remove(&product.name) {
                    Some(remaining) => {
                        log::info!("Removed: {} (${:.2}), {} left", product.name, product.price, remaining);
                        (
                            ScanOutcome::Removed { remaining },
                            format!("Removed {} from cart", product.name),
                        )
                    }
                    None => {
                        log::info!("Item '{}' not in cart; cannot remove", product.name);
                        (
                            ScanOutcome::RemoveMiss,
                            format!("{} not in cart to remove", product.name),
                        )
                    }
                };

                Reconciliation {
                    outcome,
                    notification,
                    recommendation_action: RecommendationAction::Clear,
                }
            }
        }
    }
}
