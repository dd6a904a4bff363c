pub mod app;
pub mod backend;
pub mod cart;
pub mod core;
pub mod notifications;
pub mod session;
