use std::collections::HashMap;
use std::sync::RwLock;

use taxclass_core::TaxId;
use taxclass_taxes::{Tax, TaxCatalog};

#[derive(Debug, Default)]
pub struct InMemoryTaxCatalog {
    inner: RwLock<HashMap<TaxId, Tax>>,
}

impl InMemoryTaxCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, tax: Tax) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(tax.id, tax);
        }
    }
}

impl TaxCatalog for InMemoryTaxCatalog {
    fn get(&self, tax_id: TaxId) -> Option<Tax> {
        let map = self.inner.read().ok()?;
        map.get(&tax_id).cloned()
    }

    fn list(&self) -> Vec<Tax> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }
}
