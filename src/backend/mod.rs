//! Vision backend boundary: the async trait the controller depends on and
//! its HTTP implementation.

pub mod client;
pub mod error;
pub mod traits;

pub use client::{HttpBackend, DEFAULT_BACKEND_URL, DEFAULT_REQUEST_TIMEOUT};
pub use error::{BackendError, BackendResult};
pub use traits::ScanBackend;
