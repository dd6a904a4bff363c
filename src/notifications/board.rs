//! Notification board: the single short-lived message shown to the shopper
//!
//! Every publish replaces the current message and hands back a generation
//! number; the caller schedules one expiry per publish and feeds the
//! generation back through [`NotificationBoard::expire`] when it fires.
//! Earlier timers are never cancelled. Whether a stale timer may clear a
//! newer message is decided by the [`ExpiryPolicy`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::{Display, EnumString};

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(3_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExpiryPolicy {
    /// Any expiry clears whatever is on the board, even a newer message
    #[default]
    Independent,
    /// An expiry only clears the message it was scheduled for
    Latest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct NotificationBoard {
    current: Option<Notice>,
    next_generation: u64,
    ttl: Duration,
    policy: ExpiryPolicy,
}

impl Default for NotificationBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL, ExpiryPolicy::default())
    }
}

impl NotificationBoard {
    pub fn new(ttl: Duration, policy: ExpiryPolicy) -> Self {
        Self {
            current: None,
            next_generation: 1,
            ttl,
            policy,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|n| n.message.as_str())
    }

    /// Show `message`, returning the generation to pass to `expire` after the TTL
    pub fn publish(&mut self, message: impl Into<String>) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.current = Some(Notice {
            message: message.into(),
            generation,
        });
        generation
    }

    /// Handle the expiry timer of `generation`.
    ///
    /// Returns the generation of the notice that was cleared, if any.
    pub fn expire(&mut self, generation: u64) -> Option<u64> {
        let shown = self.current.as_ref()?.generation;
        match self.policy {
            ExpiryPolicy::Independent => {
                if shown != generation {
                    log::trace!(
                        "Expiry of notification #{} clears newer notification #{}",
                        generation,
                        shown
                    );
                }
            }
            ExpiryPolicy::Latest if shown != generation => return None,
            ExpiryPolicy::Latest => {}
        }
        self.current = None;
        Some(shown)
    }
}
