//! In-memory implementations of the catalog and store traits, for tests, dev
//! and the snapshot-driven backfill binary.

pub mod classifications;
pub mod products;
pub mod taxes;

use std::sync::Arc;

use taxclass_classification::{ClassificationRegistry, RegistryConfig};

pub use classifications::InMemoryClassificationStore;
pub use products::InMemoryProductCatalog;
pub use taxes::InMemoryTaxCatalog;

/// Registry wired to shared in-memory stores.
pub type InMemoryRegistry = ClassificationRegistry<
    Arc<InMemoryClassificationStore>,
    Arc<InMemoryTaxCatalog>,
    Arc<InMemoryProductCatalog>,
>;

/// One handle per table, shareable with a registry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStores {
    pub taxes: Arc<InMemoryTaxCatalog>,
    pub products: Arc<InMemoryProductCatalog>,
    pub classifications: Arc<InMemoryClassificationStore>,
}

impl InMemoryStores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self, config: RegistryConfig) -> InMemoryRegistry {
        ClassificationRegistry::new(
            self.classifications.clone(),
            self.taxes.clone(),
            self.products.clone(),
            config,
        )
    }
}
