//! Classification registry: CRUD, reverse product lookup, delete guard and the
//! deduplicating factory.

use chrono::Utc;
use tracing::{debug, info, warn};

use taxclass_core::{
    Aggregate, AggregateRoot, ClassificationId, CompanyId, DomainError, DomainResult, TaxId,
};
use taxclass_events::Event;
use taxclass_products::{ProductCatalog, ProductTemplate};
use taxclass_taxes::{Tax, TaxCatalog, TaxUse};

use crate::classification::{
    ClassificationChanges, ClassificationCommand, CreateClassification, FiscalClassification,
    UpdateClassification,
};
use crate::naming::synthesize_name;
use crate::store::ClassificationStore;
use crate::tax_set::{ClassificationKey, TaxSet};

/// Registry settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Company pre-filled on user drafts. `None` drafts apply to all companies.
    pub default_company: Option<CompanyId>,
}

/// Input for a user-created classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClassification {
    pub name: String,
    pub company_id: Option<CompanyId>,
    pub active: bool,
    pub sale_tax_ids: TaxSet,
    pub purchase_tax_ids: TaxSet,
}

impl NewClassification {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company_id: None,
            active: true,
            sale_tax_ids: TaxSet::new(),
            purchase_tax_ids: TaxSet::new(),
        }
    }

    pub fn with_company(mut self, company_id: Option<CompanyId>) -> Self {
        self.company_id = company_id;
        self
    }

    pub fn with_sale_taxes(mut self, taxes: impl IntoIterator<Item = TaxId>) -> Self {
        self.sale_tax_ids = taxes.into_iter().collect();
        self
    }

    pub fn with_purchase_taxes(mut self, taxes: impl IntoIterator<Item = TaxId>) -> Self {
        self.purchase_tax_ids = taxes.into_iter().collect();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Entry point for everything that reads or changes classifications.
///
/// No uniqueness constraint backs the one-classification-per-key rule; it holds as
/// long as automatic creation goes through [`ClassificationRegistry::find_or_create`].
#[derive(Debug)]
pub struct ClassificationRegistry<S, T, P> {
    store: S,
    taxes: T,
    catalog: P,
    config: RegistryConfig,
}

impl<S, T, P> ClassificationRegistry<S, T, P>
where
    S: ClassificationStore,
    T: TaxCatalog,
    P: ProductCatalog,
{
    pub fn new(store: S, taxes: T, catalog: P, config: RegistryConfig) -> Self {
        Self {
            store,
            taxes,
            catalog,
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn catalog(&self) -> &P {
        &self.catalog
    }

    /// A blank draft scoped to the configured default company.
    pub fn draft(&self, name: impl Into<String>) -> NewClassification {
        NewClassification::new(name).with_company(self.config.default_company)
    }

    /// Create a classification from user input.
    ///
    /// Every tax must be a root tax usable on its side (`sale`/`all` for sale taxes,
    /// `purchase`/`all` for purchase taxes).
    pub fn create(&self, draft: NewClassification) -> DomainResult<ClassificationId> {
        self.ensure_eligible(&draft.sale_tax_ids, TaxUse::Sale)?;
        self.ensure_eligible(&draft.purchase_tax_ids, TaxUse::Purchase)?;
        self.insert(draft)
    }

    /// Apply a partial update.
    ///
    /// Linked products are left as they are, even when the tax sets change.
    pub fn write(&self, id: ClassificationId, changes: ClassificationChanges) -> DomainResult<()> {
        let mut classification = self.store.get(id).ok_or_else(DomainError::not_found)?;
        if let Some(sale) = &changes.sale_tax_ids {
            self.ensure_eligible(sale, TaxUse::Sale)?;
        }
        if let Some(purchase) = &changes.purchase_tax_ids {
            self.ensure_eligible(purchase, TaxUse::Purchase)?;
        }

        let cmd = ClassificationCommand::UpdateClassification(UpdateClassification {
            classification_id: id,
            changes,
            occurred_at: Utc::now(),
        });
        self.execute(&mut classification, &cmd)
    }

    pub fn browse(&self, id: ClassificationId) -> Option<FiscalClassification> {
        self.store.get(id)
    }

    /// Active classifications, oldest first.
    pub fn search(&self) -> Vec<FiscalClassification> {
        self.search_all()
            .into_iter()
            .filter(FiscalClassification::is_active)
            .collect()
    }

    /// All classifications including inactive ones, oldest first.
    pub fn search_all(&self) -> Vec<FiscalClassification> {
        let mut all = self.store.list();
        all.sort_by_key(FiscalClassification::id_typed);
        all
    }

    /// Products (active and archived) linked to a classification.
    pub fn products(&self, id: ClassificationId) -> Vec<ProductTemplate> {
        let mut products = self.catalog.by_classification(id);
        products.sort_by_key(|p| p.id);
        products
    }

    pub fn product_count(&self, id: ClassificationId) -> usize {
        self.catalog.by_classification(id).len()
    }

    /// Taxes that may be offered on one side of a classification.
    pub fn eligible_taxes(&self, side: TaxUse) -> Vec<Tax> {
        let mut taxes: Vec<Tax> = self
            .taxes
            .list()
            .into_iter()
            .filter(|t| t.eligible_for(side))
            .collect();
        taxes.sort_by_key(|t| t.id);
        taxes
    }

    /// Delete classifications.
    ///
    /// Fails without deleting anything if any of them is unknown or still has
    /// linked products.
    pub fn unlink(&self, ids: &[ClassificationId]) -> DomainResult<()> {
        let mut doomed = Vec::with_capacity(ids.len());
        for &id in ids {
            doomed.push(self.store.get(id).ok_or_else(DomainError::not_found)?);
        }

        for classification in &doomed {
            let count = self.product_count(classification.id_typed());
            if count != 0 {
                warn!(
                    classification_id = %classification.id_typed(),
                    products = count,
                    "refusing to delete fiscal classification with linked products"
                );
                return Err(DomainError::validation(format!(
                    "You cannot delete The Fiscal Classification '{}' because it contents {} \
                     products. Please move products to another Fiscal Classification first.",
                    classification.name(),
                    count
                )));
            }
        }

        for classification in &doomed {
            self.store.remove(classification.id_typed());
            info!(classification_id = %classification.id_typed(), "deleted fiscal classification");
        }
        Ok(())
    }

    /// Return the classification matching a company scope and two tax sets exactly,
    /// creating one with a synthesized name when none exists.
    ///
    /// Inactive classifications are matched too. Input order and duplicates are
    /// irrelevant.
    pub fn find_or_create(
        &self,
        company_id: Option<CompanyId>,
        sale_tax_ids: impl IntoIterator<Item = TaxId>,
        purchase_tax_ids: impl IntoIterator<Item = TaxId>,
    ) -> DomainResult<ClassificationId> {
        self.find_or_create_key(&ClassificationKey::new(
            company_id,
            sale_tax_ids,
            purchase_tax_ids,
        ))
    }

    pub fn find_or_create_key(&self, key: &ClassificationKey) -> DomainResult<ClassificationId> {
        if let Some(id) = self.find(key) {
            debug!(classification_id = %id, "reusing fiscal classification");
            return Ok(id);
        }

        let sale_labels = self.labels(&key.sale_tax_ids)?;
        let purchase_labels = self.labels(&key.purchase_tax_ids)?;
        let draft = NewClassification {
            name: synthesize_name(&sale_labels, &purchase_labels),
            company_id: key.company_id,
            active: true,
            sale_tax_ids: key.sale_tax_ids.clone(),
            purchase_tax_ids: key.purchase_tax_ids.clone(),
        };
        self.insert(draft)
    }

    /// First classification (oldest first, inactive included) matching `key`.
    pub fn find(&self, key: &ClassificationKey) -> Option<ClassificationId> {
        self.search_all()
            .into_iter()
            .find(|c| c.matches(key))
            .map(|c| c.id_typed())
    }

    fn insert(&self, draft: NewClassification) -> DomainResult<ClassificationId> {
        let id = ClassificationId::new();
        let mut classification = FiscalClassification::empty(id);
        let cmd = ClassificationCommand::CreateClassification(CreateClassification {
            classification_id: id,
            name: draft.name,
            company_id: draft.company_id,
            active: draft.active,
            sale_tax_ids: draft.sale_tax_ids,
            purchase_tax_ids: draft.purchase_tax_ids,
            occurred_at: Utc::now(),
        });
        self.execute(&mut classification, &cmd)?;
        info!(
            classification_id = %id,
            name = classification.name(),
            "created fiscal classification"
        );
        Ok(id)
    }

    fn execute(
        &self,
        classification: &mut FiscalClassification,
        cmd: &ClassificationCommand,
    ) -> DomainResult<()> {
        let events = classification.handle(cmd)?;
        if events.is_empty() {
            return Ok(());
        }
        for event in &events {
            classification.apply(event);
            debug!(
                event_type = event.event_type(),
                classification_id = %classification.id_typed(),
                version = classification.version(),
                "applied classification event"
            );
        }
        self.store.upsert(classification.clone())
    }

    fn tax(&self, id: TaxId) -> DomainResult<Tax> {
        self.taxes
            .get(id)
            .ok_or_else(|| DomainError::validation(format!("unknown tax {id}")))
    }

    fn labels(&self, taxes: &TaxSet) -> DomainResult<Vec<String>> {
        taxes
            .iter()
            .map(|id| self.tax(id).map(|t| t.label().to_string()))
            .collect()
    }

    fn ensure_eligible(&self, taxes: &TaxSet, side: TaxUse) -> DomainResult<()> {
        for id in taxes.iter() {
            let tax = self.tax(id)?;
            if !tax.is_root() {
                return Err(DomainError::validation(format!(
                    "tax '{}' is a child tax and cannot be part of a classification",
                    tax.name
                )));
            }
            if !tax.type_tax_use.allows(side) {
                return Err(DomainError::validation(format!(
                    "tax '{}' ({}) cannot be used as a {side} tax",
                    tax.name, tax.type_tax_use
                )));
            }
        }
        Ok(())
    }
}
