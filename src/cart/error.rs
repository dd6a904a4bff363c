//! Scan Error Types

/// Reasons a scan event is dropped before it reaches the cart
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScanError {
    /// Payload missing a name or a usable price
    #[error("Invalid scan payload: {reason}")]
    InvalidScan { reason: String },

    /// Same product accepted less than one cooldown ago
    #[error("Duplicate scan of '{name}' within cooldown")]
    DuplicateScan { name: String },
}

impl crate::core::error_handling::ContextualError for ScanError {
    fn is_user_actionable(&self) -> bool {
        false // Scan problems originate in the vision backend
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

pub type ScanResult<T> = Result<T, ScanError>;

/// Failures loading a recommendation table from disk
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Failed to read recommendation table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid recommendation table {path}: {message}")]
    Parse { path: String, message: String },
}

impl crate::core::error_handling::ContextualError for TableError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, TableError::Parse { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            TableError::Parse { message, .. } => Some(message),
            TableError::Io { .. } => None,
        }
    }
}
