//! Tax sets and the (company, sale, purchase) key classifications are matched on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use taxclass_core::{CompanyId, TaxId, ValueObject};

/// An unordered set of taxes, kept in ascending id order.
///
/// Equality is set equality: collecting `[b, a, a]` and `[a, b]` yields the same
/// set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxSet(BTreeSet<TaxId>);

impl TaxSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, tax_id: TaxId) -> bool {
        self.0.contains(&tax_id)
    }

    /// Taxes in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = TaxId> + '_ {
        self.0.iter().copied()
    }
}

impl ValueObject for TaxSet {}

impl FromIterator<TaxId> for TaxSet {
    fn from_iter<I: IntoIterator<Item = TaxId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a TaxId> for TaxSet {
    fn from_iter<I: IntoIterator<Item = &'a TaxId>>(iter: I) -> Self {
        Self(iter.into_iter().copied().collect())
    }
}

impl<'a> IntoIterator for &'a TaxSet {
    type Item = &'a TaxId;
    type IntoIter = std::collections::btree_set::Iter<'a, TaxId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Identity of a tax combination: at most one classification should exist per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassificationKey {
    pub company_id: Option<CompanyId>,
    pub sale_tax_ids: TaxSet,
    pub purchase_tax_ids: TaxSet,
}

impl ClassificationKey {
    pub fn new(
        company_id: Option<CompanyId>,
        sale_tax_ids: impl IntoIterator<Item = TaxId>,
        purchase_tax_ids: impl IntoIterator<Item = TaxId>,
    ) -> Self {
        Self {
            company_id,
            sale_tax_ids: sale_tax_ids.into_iter().collect(),
            purchase_tax_ids: purchase_tax_ids.into_iter().collect(),
        }
    }
}

impl ValueObject for ClassificationKey {}
