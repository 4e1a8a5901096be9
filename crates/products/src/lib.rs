//! Product templates as seen by the fiscal classification module.
//!
//! The product catalog itself lives elsewhere; this crate models the fields a
//! classification reads or writes (company, active flag, classification link and
//! the legacy per-product tax sets) plus the catalog interface.

pub mod product;

pub use product::{ProductCatalog, ProductTemplate};
