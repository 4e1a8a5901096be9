use std::sync::Arc;

use serde::{Deserialize, Serialize};

use taxclass_core::{ClassificationId, CompanyId, DomainResult, Entity, ProductId, TaxId};

fn default_active() -> bool {
    true
}

/// A product template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTemplate {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub fiscal_classification_id: Option<ClassificationId>,
    /// Legacy customer taxes, read only by the backfill.
    #[serde(default)]
    pub sale_tax_ids: Vec<TaxId>,
    /// Legacy supplier taxes, read only by the backfill.
    #[serde(default)]
    pub purchase_tax_ids: Vec<TaxId>,
}

impl ProductTemplate {
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            company_id: None,
            active: true,
            fiscal_classification_id: None,
            sale_tax_ids: Vec::new(),
            purchase_tax_ids: Vec::new(),
        }
    }

    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn with_legacy_taxes(mut self, sale: Vec<TaxId>, purchase: Vec<TaxId>) -> Self {
        self.sale_tax_ids = sale;
        self.purchase_tax_ids = purchase;
        self
    }

    pub fn with_classification(mut self, classification_id: ClassificationId) -> Self {
        self.fiscal_classification_id = Some(classification_id);
        self
    }

    pub fn archived(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn is_classified(&self) -> bool {
        self.fiscal_classification_id.is_some()
    }
}

impl Entity for ProductTemplate {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Access to product templates, active and archived alike.
pub trait ProductCatalog: Send + Sync {
    fn get(&self, product_id: ProductId) -> Option<ProductTemplate>;
    fn list(&self) -> Vec<ProductTemplate>;

    /// Reverse lookup: every product (active or not) linked to a classification.
    fn by_classification(&self, classification_id: ClassificationId) -> Vec<ProductTemplate>;

    /// Link a product to a classification, replacing any previous link.
    fn assign_classification(
        &self,
        product_id: ProductId,
        classification_id: ClassificationId,
    ) -> DomainResult<()>;
}

impl<S> ProductCatalog for Arc<S>
where
    S: ProductCatalog + ?Sized,
{
    fn get(&self, product_id: ProductId) -> Option<ProductTemplate> {
        (**self).get(product_id)
    }

    fn list(&self) -> Vec<ProductTemplate> {
        (**self).list()
    }

    fn by_classification(&self, classification_id: ClassificationId) -> Vec<ProductTemplate> {
        (**self).by_classification(classification_id)
    }

    fn assign_classification(
        &self,
        product_id: ProductId,
        classification_id: ClassificationId,
    ) -> DomainResult<()> {
        (**self).assign_classification(product_id, classification_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_is_active_and_unclassified() {
        let product = ProductTemplate::new(ProductId::new(), "Apples");
        assert!(product.active);
        assert!(!product.is_classified());
        assert!(product.company_id.is_none());
    }

    #[test]
    fn deserializing_without_active_defaults_to_true() {
        let id = ProductId::new();
        let json = format!(r#"{{"id":"{id}","name":"Pears"}}"#);
        let product: ProductTemplate = serde_json::from_str(&json).unwrap();
        assert!(product.active);
        assert!(product.sale_tax_ids.is_empty());
        assert!(product.purchase_tax_ids.is_empty());
    }

    #[test]
    fn builders_set_links() {
        let company = CompanyId::new();
        let classification = ClassificationId::new();
        let tax = TaxId::new();
        let product = ProductTemplate::new(ProductId::new(), "Bread")
            .with_company(company)
            .with_legacy_taxes(vec![tax], vec![])
            .with_classification(classification)
            .archived();

        assert_eq!(product.company_id, Some(company));
        assert_eq!(product.sale_tax_ids, vec![tax]);
        assert_eq!(product.fiscal_classification_id, Some(classification));
        assert!(!product.active);
    }
}
