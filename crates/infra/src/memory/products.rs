use std::collections::HashMap;
use std::sync::RwLock;

use taxclass_core::{ClassificationId, DomainError, DomainResult, ProductId};
use taxclass_products::{ProductCatalog, ProductTemplate};

#[derive(Debug, Default)]
pub struct InMemoryProductCatalog {
    inner: RwLock<HashMap<ProductId, ProductTemplate>>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product: ProductTemplate) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(product.id, product);
        }
    }
}

impl ProductCatalog for InMemoryProductCatalog {
    fn get(&self, product_id: ProductId) -> Option<ProductTemplate> {
        let map = self.inner.read().ok()?;
        map.get(&product_id).cloned()
    }

    fn list(&self) -> Vec<ProductTemplate> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    fn by_classification(&self, classification_id: ClassificationId) -> Vec<ProductTemplate> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        map.values()
            .filter(|p| p.fiscal_classification_id == Some(classification_id))
            .cloned()
            .collect()
    }

    fn assign_classification(
        &self,
        product_id: ProductId,
        classification_id: ClassificationId,
    ) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("product catalog lock poisoned"))?;
        let product = map.get_mut(&product_id).ok_or_else(DomainError::not_found)?;
        product.fiscal_classification_id = Some(classification_id);
        Ok(())
    }
}
