use std::collections::HashMap;
use std::sync::RwLock;

use taxclass_classification::{ClassificationStore, FiscalClassification};
use taxclass_core::{ClassificationId, DomainError, DomainResult};

#[derive(Debug, Default)]
pub struct InMemoryClassificationStore {
    inner: RwLock<HashMap<ClassificationId, FiscalClassification>>,
}

impl InMemoryClassificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClassificationStore for InMemoryClassificationStore {
    fn get(&self, id: ClassificationId) -> Option<FiscalClassification> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn upsert(&self, classification: FiscalClassification) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("classification store lock poisoned"))?;
        map.insert(classification.id_typed(), classification);
        Ok(())
    }

    fn list(&self) -> Vec<FiscalClassification> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    fn remove(&self, id: ClassificationId) -> bool {
        match self.inner.write() {
            Ok(mut map) => map.remove(&id).is_some(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use taxclass_classification::RegistryConfig;

    use super::*;
    use crate::memory::InMemoryStores;

    #[test]
    fn upsert_then_get_and_remove() {
        let store = InMemoryClassificationStore::new();
        let id = ClassificationId::new();

        store.upsert(FiscalClassification::empty(id)).unwrap();
        assert!(store.get(id).is_some());
        assert!(store.remove(id));
        assert!(!store.remove(id));
    }

    #[test]
    fn upsert_reports_a_poisoned_lock() {
        let store = Arc::new(InMemoryClassificationStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        let err = store
            .upsert(FiscalClassification::empty(ClassificationId::new()))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert!(store.list().is_empty());
    }

    #[test]
    fn registry_does_not_hand_out_unstored_ids() {
        let stores = InMemoryStores::new();
        let poisoner = stores.classifications.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        let registry = stores.registry(RegistryConfig::default());
        let err = registry.find_or_create(None, [], []).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }
}
