//! Application layer: startup, operator console and terminal display

pub mod cli;
pub mod console;
pub mod startup;
