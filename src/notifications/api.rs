//! Public API for the notification system
//!
//! External modules should import from here rather than directly from internal modules.

pub use crate::notifications::board::{
    ExpiryPolicy, Notice, NotificationBoard, DEFAULT_NOTIFICATION_TTL,
};
pub use crate::notifications::error::NotificationError;
pub use crate::notifications::event::{CartSnapshot, EventFilter, KioskEvent, KioskEventType};
pub use crate::notifications::manager::{AsyncNotificationManager, EventReceiver};
