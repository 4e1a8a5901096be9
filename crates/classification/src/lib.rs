//! Fiscal classifications: named bundles of sale and purchase taxes that products
//! reference instead of carrying their own tax sets.
//!
//! - [`classification`]: the aggregate (commands, events, validation).
//! - [`naming`]: descriptive names synthesized from tax labels.
//! - [`registry`]: CRUD, reverse product lookup, delete guard and the
//!   deduplicating `find_or_create` factory.
//! - [`backfill`]: one-time assignment of classifications to legacy products.

pub mod backfill;
pub mod classification;
pub mod naming;
pub mod registry;
pub mod store;
pub mod tax_set;

pub use backfill::{backfill, BackfillReport};
pub use classification::{
    ClassificationChanges, ClassificationCommand, ClassificationCreated, ClassificationEvent,
    ClassificationUpdated, CreateClassification, FiscalClassification, UpdateClassification,
};
pub use naming::{synthesize_name, MAX_NAME_LENGTH};
pub use registry::{ClassificationRegistry, NewClassification, RegistryConfig};
pub use store::ClassificationStore;
pub use tax_set::{ClassificationKey, TaxSet};
