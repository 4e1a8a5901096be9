//! JSON snapshot of the three tables the backfill touches.

use std::path::Path;

use serde::{Deserialize, Serialize};

use taxclass_classification::{ClassificationStore, FiscalClassification};
use taxclass_products::{ProductCatalog, ProductTemplate};
use taxclass_taxes::{Tax, TaxCatalog};

use crate::error::InfraError;
use crate::memory::InMemoryStores;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub taxes: Vec<Tax>,
    #[serde(default)]
    pub products: Vec<ProductTemplate>,
    #[serde(default)]
    pub classifications: Vec<FiscalClassification>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, InfraError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, InfraError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let raw = std::fs::read_to_string(path).map_err(|source| InfraError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn save(&self, path: &Path) -> Result<(), InfraError> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|source| InfraError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load every record into fresh in-memory stores.
    pub fn into_stores(self) -> Result<InMemoryStores, InfraError> {
        let stores = InMemoryStores::new();
        for tax in self.taxes {
            stores.taxes.insert(tax);
        }
        for product in self.products {
            stores.products.insert(product);
        }
        for classification in self.classifications {
            stores.classifications.upsert(classification)?;
        }
        Ok(stores)
    }

    /// Read the current content of the stores back, ordered by id.
    pub fn capture(stores: &InMemoryStores) -> Self {
        let mut taxes = stores.taxes.list();
        taxes.sort_by_key(|t| t.id);
        let mut products = stores.products.list();
        products.sort_by_key(|p| p.id);
        let mut classifications = stores.classifications.list();
        classifications.sort_by_key(FiscalClassification::id_typed);

        Self {
            taxes,
            products,
            classifications,
        }
    }
}
