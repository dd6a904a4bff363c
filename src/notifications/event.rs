//! Event types for the notification system

use chrono::{DateTime, Local};

use crate::cart::{Cart, CartLine, Mode, RecommendationSet};
use crate::session::ScanningState;

/// Point-in-time copy of the cart for subscribers
#[derive(Clone, Debug, PartialEq)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub total: f64,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            total: cart.total(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum KioskEventType {
    CartChanged(CartSnapshot),
    ModeChanged(Mode),
    RecommendationsChanged(RecommendationSet),
    NotificationShown { message: String, generation: u64 },
    NotificationCleared { generation: u64 },
    ScanningChanged(ScanningState),
    Shutdown,
}

/// An event published by the kiosk controller
#[derive(Clone, Debug)]
pub struct KioskEvent {
    pub event_type: KioskEventType,
    pub timestamp: DateTime<Local>,
}

impl KioskEvent {
    pub fn new(event_type: KioskEventType) -> Self {
        Self {
            event_type,
            timestamp: Local::now(),
        }
    }

    /// Short name used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self.event_type {
            KioskEventType::CartChanged(_) => "CartChanged",
            KioskEventType::ModeChanged(_) => "ModeChanged",
            KioskEventType::RecommendationsChanged(_) => "RecommendationsChanged",
            KioskEventType::NotificationShown { .. } => "NotificationShown",
            KioskEventType::NotificationCleared { .. } => "NotificationCleared",
            KioskEventType::ScanningChanged(_) => "ScanningChanged",
            KioskEventType::Shutdown => "Shutdown",
        }
    }
}

/// Which events a subscriber wants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventFilter {
    /// Cart and recommendation changes
    CartOnly,
    /// Notification shown/cleared
    NoticesOnly,
    /// Mode, scanning state and shutdown
    SessionOnly,
    All,
}

impl EventFilter {
    pub fn accepts(&self, event: &KioskEvent) -> bool {
        use KioskEventType::*;
        matches!(
            (self, &event.event_type),
            (EventFilter::All, _)
                | (EventFilter::CartOnly, CartChanged(_))
                | (EventFilter::CartOnly, RecommendationsChanged(_))
                | (EventFilter::NoticesOnly, NotificationShown { .. })
                | (EventFilter::NoticesOnly, NotificationCleared { .. })
                | (EventFilter::SessionOnly, ModeChanged(_))
                | (EventFilter::SessionOnly, ScanningChanged(_))
                | (EventFilter::SessionOnly, Shutdown)
        )
    }
}
