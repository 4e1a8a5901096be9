//! One-time assignment of classifications to products that predate them.
//!
//! Each unclassified product is keyed on its company and legacy tax sets; products
//! sharing a key end up on the same classification. Archived products are left
//! alone. Meant to run once at install or upgrade time, not as a recurring job.
//!
//! A failure (e.g. a legacy tax missing from the catalog) aborts the run; products
//! assigned before the failure keep their classification.

use std::collections::HashMap;

use tracing::{debug, info};

use taxclass_core::{ClassificationId, DomainResult};
use taxclass_products::ProductCatalog;
use taxclass_taxes::TaxCatalog;

use crate::registry::ClassificationRegistry;
use crate::store::ClassificationStore;
use crate::tax_set::ClassificationKey;

/// Outcome of a backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    /// Active products that had no classification when the run started.
    pub products_total: usize,
    pub products_assigned: usize,
    pub classifications_created: usize,
    /// Products linked to a classification that already existed or was minted
    /// earlier in the same run.
    pub classifications_reused: usize,
}

pub fn backfill<S, T, P>(registry: &ClassificationRegistry<S, T, P>) -> DomainResult<BackfillReport>
where
    S: ClassificationStore,
    T: TaxCatalog,
    P: ProductCatalog,
{
    let mut known: HashMap<ClassificationKey, ClassificationId> = HashMap::new();
    for classification in registry.search_all() {
        known
            .entry(classification.key())
            .or_insert_with(|| classification.id_typed());
    }

    let mut pending: Vec<_> = registry
        .catalog()
        .list()
        .into_iter()
        .filter(|p| p.active && !p.is_classified())
        .collect();
    pending.sort_by_key(|p| p.id);

    let mut report = BackfillReport {
        products_total: pending.len(),
        ..BackfillReport::default()
    };

    for (index, product) in pending.iter().enumerate() {
        let key = ClassificationKey::new(
            product.company_id,
            product.sale_tax_ids.iter().copied(),
            product.purchase_tax_ids.iter().copied(),
        );

        let classification_id = match known.get(&key) {
            Some(&id) => {
                report.classifications_reused += 1;
                id
            }
            None => {
                info!(
                    managed = index + 1,
                    total = report.products_total,
                    "creating fiscal classification during backfill"
                );
                let id = registry.find_or_create_key(&key)?;
                known.insert(key, id);
                report.classifications_created += 1;
                id
            }
        };

        registry
            .catalog()
            .assign_classification(product.id, classification_id)?;
        report.products_assigned += 1;
        debug!(
            product_id = %product.id,
            classification_id = %classification_id,
            "assigned product"
        );
    }

    info!(
        assigned = report.products_assigned,
        created = report.classifications_created,
        reused = report.classifications_reused,
        "fiscal classification backfill finished"
    );
    Ok(report)
}
