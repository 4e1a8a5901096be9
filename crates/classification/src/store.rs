use std::sync::Arc;

use taxclass_core::{ClassificationId, DomainResult};

use crate::classification::FiscalClassification;

/// Persistence for classifications, active and inactive alike.
pub trait ClassificationStore: Send + Sync {
    fn get(&self, id: ClassificationId) -> Option<FiscalClassification>;
    fn upsert(&self, classification: FiscalClassification) -> DomainResult<()>;
    fn list(&self) -> Vec<FiscalClassification>;
    /// Returns `false` when nothing was stored under `id`.
    fn remove(&self, id: ClassificationId) -> bool;
}

impl<S> ClassificationStore for Arc<S>
where
    S: ClassificationStore + ?Sized,
{
    fn get(&self, id: ClassificationId) -> Option<FiscalClassification> {
        (**self).get(id)
    }

    fn upsert(&self, classification: FiscalClassification) -> DomainResult<()> {
        (**self).upsert(classification)
    }

    fn list(&self) -> Vec<FiscalClassification> {
        (**self).list()
    }

    fn remove(&self, id: ClassificationId) -> bool {
        (**self).remove(id)
    }
}
