//! Session Error Types

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to write bill to {path}: {source}")]
    BillWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The controller task has stopped and no longer accepts commands
    #[error("Kiosk controller is not running")]
    ControllerClosed,
}

impl crate::core::error_handling::ContextualError for SessionError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, SessionError::BillWrite { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            SessionError::BillWrite { .. } => Some("Could not save the bill; check --bill-dir"),
            SessionError::ControllerClosed => None,
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error_handling::ContextualError;

    #[test]
    fn test_only_bill_write_is_actionable() {
        let bill = SessionError::BillWrite {
            path: "/bills/NexCart_Bill.txt".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(bill.is_user_actionable());
        assert!(bill.user_message().unwrap().contains("--bill-dir"));
        assert!(bill.to_string().contains("/bills/NexCart_Bill.txt"));

        let closed = SessionError::ControllerClosed;
        assert!(!closed.is_user_actionable());
        assert!(closed.user_message().is_none());
    }
}
