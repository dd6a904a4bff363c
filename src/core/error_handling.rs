//! Generic error handling utilities
//!
//! Errors from every subsystem (config, backend, session, cart) implement
//! [`ContextualError`] so that boundary code can decide whether to show the
//! operator a specific message or just the failed operation.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// True for errors the operator can fix: bad flags, bad config values,
    /// an unwritable bill directory
    fn is_user_actionable(&self) -> bool;

    /// The message to show when this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log an error with the detail level that suits it
///
/// User-actionable errors log their own message; system errors log the
/// operation context. Full details always go to debug level.
///
/// # Examples
/// ```rust,no_run
/// # use nexcart::core::error_handling::log_error_with_context;
/// # use nexcart::app::cli::config::ConfigError;
/// let err = ConfigError::InvalidValue {
///     key: "cooldown-ms".to_string(),
///     message: "cooldown-ms must be a positive integer".to_string(),
/// };
/// log_error_with_context(&err, "Loading configuration");
/// // Logs: "cooldown-ms must be a positive integer"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => log::error!("{}", user_msg),
        None => log::error!("{} failed: {}", operation_context, error),
    }
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
