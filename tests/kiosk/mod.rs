pub mod cart_properties;
pub mod session;
