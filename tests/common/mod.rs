//! Shared test doubles

pub mod mock_backend;
