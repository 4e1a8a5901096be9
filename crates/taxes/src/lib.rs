//! Taxes as seen by the fiscal classification module.
//!
//! Taxes are owned by the accounting side of the system; this crate only models
//! the attributes a classification reads (name, description, type of use, parent)
//! and the lookup interface it needs.

pub mod tax;

pub use tax::{Tax, TaxCatalog, TaxUse};
