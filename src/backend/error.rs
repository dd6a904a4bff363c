//! Backend Error Types

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Connection refused, DNS failure, timeout and the like
    #[error("Backend unreachable during '{operation}': {cause}")]
    Unreachable { operation: String, cause: String },

    /// Backend answered with a non-success status
    #[error("Backend returned HTTP {status} for '{operation}'")]
    Status { operation: String, status: u16 },

    /// Response body could not be read or decoded
    #[error("Malformed backend response for '{operation}': {cause}")]
    Decode { operation: String, cause: String },

    /// Client could not be constructed from the configured values
    #[error("Backend client configuration error: {message}")]
    Configuration { message: String },
}

impl BackendError {
    pub(crate) fn unreachable(operation: &str, error: reqwest::Error) -> Self {
        BackendError::Unreachable {
            operation: operation.to_string(),
            cause: error.to_string(),
        }
    }

    pub(crate) fn decode(operation: &str, error: impl std::fmt::Display) -> Self {
        BackendError::Decode {
            operation: operation.to_string(),
            cause: error.to_string(),
        }
    }
}

impl crate::core::error_handling::ContextualError for BackendError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, BackendError::Configuration { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            BackendError::Configuration { message } => Some(message),
            _ => None,
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
