//! Command implementations for pyhover
//!
//! Each command is implemented in its own module.

pub mod batch;
pub mod config;
pub mod locate;
pub mod resolve;
pub mod snapshot;
pub mod version;
