//! A kiosk controller driven end to end against a scripted backend

use crate::common::mock_backend::{ScriptedBackend, BILL};
use nexcart::cart::{Mode, RecommendationEntry, RecommendationTable, ScanPayload};
use nexcart::core::time::SystemTimeProvider;
use nexcart::notifications::api::{AsyncNotificationManager, EventFilter, EventReceiver, KioskEventType};
use nexcart::session::{
    KioskController, KioskHandle, ScanningState, SessionConfig, SessionError, SessionSnapshot,
};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

struct Kiosk {
    handle: KioskHandle,
    notices: EventReceiver,
    backend: Arc<ScriptedBackend>,
    task: JoinHandle<()>,
}

fn kiosk(bill_dir: &Path) -> Kiosk {
    let backend = Arc::new(ScriptedBackend::default());
    let mut events = AsyncNotificationManager::new();
    let notices = events.subscribe("notices", EventFilter::NoticesOnly, "tests:kiosk");
    let config = SessionConfig {
        bill_dir: bill_dir.to_path_buf(),
        ..SessionConfig::default()
    };

    let (controller, handle) = KioskController::new(
        config,
        Arc::new(RecommendationTable::builtin()),
        backend.clone(),
        events,
        Arc::new(SystemTimeProvider),
    );
    Kiosk {
        handle,
        notices,
        backend,
        task: controller.spawn(),
    }
}

fn shown_messages(notices: &mut EventReceiver) -> Vec<String> {
    let mut messages = Vec::new();
    while let Ok(event) = notices.try_recv() {
        if let KioskEventType::NotificationShown { message, .. } = event.event_type {
            messages.push(message);
        }
    }
    messages
}

/// Poll the session until `done` holds or a second of kiosk time has passed
async fn wait_for(handle: &KioskHandle, done: impl Fn(&SessionSnapshot) -> bool) -> SessionSnapshot {
    for _ in 0..100 {
        let snapshot = handle.snapshot().await.unwrap();
        if done(&snapshot) {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    handle.snapshot().await.unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_shopping_trip() {
    let bill_dir = tempfile::tempdir().unwrap();
    let mut kiosk = kiosk(bill_dir.path());
    kiosk.backend.queue_scan("Bread", 2.5);
    kiosk.backend.queue_scan("Ponds Cream", 5.0);

    kiosk.handle.start_scanning().unwrap();
    tokio::time::sleep(Duration::from_millis(6_500)).await;

    let snapshot = kiosk.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.scanning, ScanningState::Active);
    assert_eq!(snapshot.lines.len(), 2);
    assert!((snapshot.total - 7.5).abs() < 1e-9);
    assert_eq!(
        snapshot.recommendations,
        vec![RecommendationEntry::new("Fogg Scent", 2, 1, &["Brand F"])]
    );

    kiosk.handle.toggle_mode().unwrap();
    kiosk.handle.submit_scan(ScanPayload::new("Bread", 2.5)).unwrap();
    let snapshot = kiosk.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.mode, Mode::Remove);
    assert_eq!(snapshot.lines.len(), 1);
    assert!(snapshot.recommendations.is_empty());

    kiosk.handle.checkout().unwrap();
    let snapshot = wait_for(&kiosk.handle, |s| s.lines.is_empty()).await;
    assert_eq!(snapshot.scanning, ScanningState::Idle);
    assert_eq!(snapshot.total, 0.0);

    let bill_path = bill_dir.path().join("NexCart_Bill.txt");
    for _ in 0..100 {
        if bill_path.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(std::fs::read(&bill_path).unwrap(), BILL);

    assert_eq!(
        shown_messages(&mut kiosk.notices),
        vec![
            "Added Bread to cart",
            "Added Ponds Cream to cart",
            "Removed Bread from cart",
            "Checkout completed!",
        ]
    );
    let calls = kiosk.backend.calls();
    assert!(calls.contains(&"start".to_string()));
    assert!(calls.contains(&"mode:remove".to_string()));
    assert!(calls.contains(&"checkout".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_stop_halts_polling() {
    let bill_dir = tempfile::tempdir().unwrap();
    let mut kiosk = kiosk(bill_dir.path());
    kiosk.backend.queue_scan("Bread", 2.5);
    kiosk.backend.queue_scan("Water Bottle", 3.0);

    kiosk.handle.start_scanning().unwrap();
    tokio::time::sleep(Duration::from_millis(3_500)).await;
    kiosk.handle.stop_scanning().unwrap();
    tokio::time::sleep(Duration::from_secs(30)).await;

    let snapshot = kiosk.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.scanning, ScanningState::Idle);
    assert_eq!(snapshot.lines.len(), 1);
    assert_eq!(kiosk.backend.pending(), 1, "no poll after stop");
    assert!(kiosk.backend.calls().contains(&"stop".to_string()));
    assert!(shown_messages(&mut kiosk.notices).contains(&"Scanning stopped.".to_string()));
}

#[tokio::test]
async fn test_failed_checkout_keeps_cart() {
    let bill_dir = tempfile::tempdir().unwrap();
    let kiosk = kiosk(bill_dir.path());
    kiosk.backend.fail_checkout.store(true, Ordering::SeqCst);
    kiosk.handle.submit_scan(ScanPayload::new("Surf Excel", 7.25)).unwrap();

    kiosk.handle.checkout().unwrap();
    let calls_made = || kiosk.backend.calls().contains(&"checkout".to_string());
    for _ in 0..100 {
        if calls_made() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    // The failed completion is queued behind nothing else; one more round trip settles it
    tokio::time::sleep(Duration::from_millis(20)).await;

    let snapshot = kiosk.handle.snapshot().await.unwrap();
    assert!(calls_made());
    assert_eq!(snapshot.lines.len(), 1);
    assert!(!bill_dir.path().join("NexCart_Bill.txt").exists());
}

#[tokio::test]
async fn test_handle_reports_closed_controller() {
    let bill_dir = tempfile::tempdir().unwrap();
    let kiosk = kiosk(bill_dir.path());

    kiosk.handle.shutdown().unwrap();
    kiosk.task.await.unwrap();

    assert!(kiosk.handle.is_closed());
    assert!(matches!(
        kiosk.handle.start_scanning(),
        Err(SessionError::ControllerClosed)
    ));
    assert!(matches!(
        kiosk.handle.snapshot().await,
        Err(SessionError::ControllerClosed)
    ));
}
