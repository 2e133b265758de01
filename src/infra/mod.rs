//! Infrastructure layer for pyhover
//!
//! Parsing, the module registry, bounded-time loading and snapshot
//! capture from a live interpreter.

pub mod ast;
pub mod introspect;
pub mod registry;
pub mod safe_import;

pub use introspect::SnapshotProducer;
pub use registry::{CatalogRegistry, ModuleRegistry};
pub use safe_import::{ImportOutcome, SafeImporter};
