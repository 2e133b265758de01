//! Service layer for pyhover

pub mod classifier;
pub mod config;
pub mod describe;
pub mod locator;
pub mod resolver;

pub use classifier::ModuleClassifier;
pub use config::{ConfigService, DefaultConfigService};
pub use describe::DescriptionBuilder;
pub use locator::PositionLocator;
pub use resolver::{DefaultSymbolResolver, SymbolResolver};
