//! Cart behaviour through the public API, with explicit scan times

use nexcart::cart::{
    Cart, CartReconciler, Mode, ModeController, Product, RecommendationEntry,
    RecommendationTable, ScanDebouncer, ScanError, ScanOutcome, ScanPayload, DEFAULT_COOLDOWN,
};
use nexcart::session::{AppState, SessionConfig};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn state() -> AppState {
    AppState::new(&SessionConfig::default(), Arc::new(RecommendationTable::builtin()))
}

fn assert_cart_invariants(cart: &Cart) {
    let mut names = HashSet::new();
    for line in cart.lines() {
        assert!(line.quantity >= 1, "{} has quantity 0", line.name);
        assert!(names.insert(line.name.clone()), "{} listed twice", line.name);
    }
    let fresh: f64 = cart
        .lines()
        .iter()
        .map(|l| l.price * l.quantity as f64)
        .sum();
    assert!((cart.total() - fresh).abs() < 1e-9);
}

#[test]
fn test_debounce_window_boundaries() {
    let mut debouncer = ScanDebouncer::new(DEFAULT_COOLDOWN);
    let bread = Product::new("Bread", 2.5);
    let t0 = Instant::now();

    assert!(debouncer.accept(&bread, t0));
    assert!(!debouncer.accept(&bread, t0 + Duration::from_millis(9_999)));
    assert!(debouncer.accept(&bread, t0 + Duration::from_millis(10_000)));
    assert!(debouncer.accept(&Product::new("Jam", 3.0), t0 + Duration::from_millis(10_001)));
}

#[test]
fn test_mode_switch_clears_debounce_record() {
    let mut debouncer = ScanDebouncer::new(DEFAULT_COOLDOWN);
    let mut mode = ModeController::default();
    let bread = Product::new("Bread", 2.5);
    let t0 = Instant::now();

    assert!(debouncer.accept(&bread, t0));
    assert_eq!(mode.switch_mode(&mut debouncer), Mode::Remove);
    assert!(debouncer.accept(&bread, t0 + Duration::from_millis(1)));
}

#[test]
fn test_invariants_hold_over_a_scan_sequence() {
    let mut state = state();
    let t0 = Instant::now();
    let scans = [
        ("Bread", 2.5),
        ("Ponds Cream", 5.0),
        ("Bread", 2.5),
        ("Surf Excel", 7.25),
        ("Water Bottle", 3.0),
    ];

    for (step, (name, price)) in scans.iter().enumerate() {
        let at = t0 + Duration::from_secs(11 * step as u64);
        let _ = state.apply_scan(ScanPayload::new(*name, *price), at);
        assert_cart_invariants(state.cart());
    }

    state.switch_mode();
    for (step, name) in ["Bread", "Jam", "Surf Excel", "Bread", "Bread"].iter().enumerate() {
        let at = t0 + Duration::from_secs(100 + 11 * step as u64);
        let _ = state.apply_scan(ScanPayload::new(*name, 1.0), at);
        assert_cart_invariants(state.cart());
    }
    assert_eq!(state.cart().quantity_of("Bread"), 0);
    assert_eq!(state.cart().quantity_of("Surf Excel"), 0);
    assert_eq!(state.cart().quantity_of("Ponds Cream"), 1);
}

#[test]
fn test_add_then_remove_restores_cart() {
    let mut reconciler = CartReconciler::new(Arc::new(RecommendationTable::builtin()));
    reconciler.reconcile(&Product::new("Ponds Cream", 5.0), Mode::Add);
    let before = reconciler.cart().clone();

    reconciler.reconcile(&Product::new("Bread", 2.5), Mode::Add);
    reconciler.reconcile(&Product::new("Bread", 2.5), Mode::Remove);

    assert_eq!(reconciler.cart(), &before);
}

#[test]
fn test_total_matches_worked_example() {
    let mut state = state();
    let t0 = Instant::now();

    state.apply_scan(ScanPayload::new("Bread", 2.5), t0).unwrap();
    state
        .apply_scan(ScanPayload::new("Bread", 2.5), t0 + Duration::from_secs(10))
        .unwrap();
    state
        .apply_scan(ScanPayload::new("Ponds Cream", 5.0), t0 + Duration::from_secs(10))
        .unwrap();

    assert!((state.total() - 10.0).abs() < 1e-9);
}

#[test]
fn test_recommendations_follow_mode() {
    let mut state = state();
    let t0 = Instant::now();

    state.apply_scan(ScanPayload::new("Bread", 2.5), t0).unwrap();
    assert_eq!(
        state.recommendations(),
        &vec![RecommendationEntry::new("Jam", 1, 3, &["Brand A", "Brand B"])]
    );

    // A product with no entry keeps what is shown
    state
        .apply_scan(ScanPayload::new("Milk", 1.2), t0 + Duration::from_secs(1))
        .unwrap();
    assert_eq!(state.recommendations().len(), 1);

    state.switch_mode();
    let report = state
        .apply_scan(ScanPayload::new("Milk", 1.2), t0 + Duration::from_secs(2))
        .unwrap();
    assert!(report.recommendations_changed);
    assert!(state.recommendations().is_empty());
}

#[test]
fn test_remove_miss_leaves_cart_alone() {
    let mut state = state();
    let t0 = Instant::now();
    state.apply_scan(ScanPayload::new("Bread", 2.5), t0).unwrap();
    let before = state.cart().clone();
    state.switch_mode();

    let report = state
        .apply_scan(ScanPayload::new("Fogg Scent", 4.0), t0 + Duration::from_secs(1))
        .unwrap();

    assert_eq!(report.outcome, ScanOutcome::RemoveMiss);
    assert_eq!(report.notification, "Fogg Scent not in cart to remove");
    assert_eq!(state.cart(), &before);
}

#[test]
fn test_rejected_scans_change_nothing() {
    let mut state = state();
    let t0 = Instant::now();
    state.apply_scan(ScanPayload::new("Bread", 2.5), t0).unwrap();
    let before = state.snapshot();

    let duplicate = state.apply_scan(ScanPayload::new("Bread", 2.5), t0 + Duration::from_secs(3));
    let invalid = state.apply_scan(ScanPayload::default(), t0 + Duration::from_secs(4));

    assert!(matches!(duplicate, Err(ScanError::DuplicateScan { .. })));
    assert!(matches!(invalid, Err(ScanError::InvalidScan { .. })));
    assert_eq!(state.snapshot(), before);
}

#[test]
fn test_checkout_empties_cart_and_recommendations() {
    let mut state = state();
    state
        .apply_scan(ScanPayload::new("Bread", 2.5), Instant::now())
        .unwrap();

    state.complete_checkout();

    assert!(state.cart().is_empty());
    assert!(state.recommendations().is_empty());
    assert_eq!(state.total(), 0.0);
}
