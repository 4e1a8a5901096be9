//! Infrastructure layer: in-memory stores, configuration, snapshot files.

pub mod config;
pub mod error;
pub mod memory;
pub mod snapshot;


pub use config::BackfillConfig;
pub use error::InfraError;
pub use memory::{
    InMemoryClassificationStore, InMemoryProductCatalog, InMemoryRegistry, InMemoryStores,
    InMemoryTaxCatalog,
};
pub use snapshot::Snapshot;
