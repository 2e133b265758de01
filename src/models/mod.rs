//! Data models for pyhover
//!
//! Contains core type definitions used throughout the application.

pub mod config;
pub mod position;
pub mod symbol;

// Re-export commonly used types
pub use config::PyhoverConfig;
pub use position::{Position, Span};
pub use symbol::{ResolutionError, ResolveResponse, ResolvedSymbol, SymbolKind};
