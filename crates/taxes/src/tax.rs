use std::sync::Arc;

use serde::{Deserialize, Serialize};

use taxclass_core::{Entity, TaxId};

/// Which side of a transaction a tax may be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxUse {
    Sale,
    Purchase,
    All,
}

impl TaxUse {
    /// Whether a tax with this type of use may be placed on the `side` tax set.
    ///
    /// `side` is expected to be `Sale` or `Purchase`; `All` only accepts `All`.
    pub fn allows(self, side: TaxUse) -> bool {
        self == TaxUse::All || self == side
    }
}

impl core::fmt::Display for TaxUse {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            TaxUse::Sale => "sale",
            TaxUse::Purchase => "purchase",
            TaxUse::All => "all",
        };
        f.write_str(s)
    }
}

/// A tax record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    pub id: TaxId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub type_tax_use: TaxUse,
    #[serde(default)]
    pub parent_id: Option<TaxId>,
}

impl Tax {
    pub fn new(id: TaxId, name: impl Into<String>, type_tax_use: TaxUse) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            type_tax_use,
            parent_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parent(mut self, parent_id: TaxId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Short text used when naming a classification: the description when set
    /// and non-empty, the name otherwise.
    pub fn label(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => &self.name,
        }
    }

    /// Only root taxes (no parent) can be members of a classification.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether this tax may be offered on the given side of a classification.
    pub fn eligible_for(&self, side: TaxUse) -> bool {
        self.is_root() && self.type_tax_use.allows(side)
    }
}

impl Entity for Tax {
    type Id = TaxId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Read access to the tax table.
pub trait TaxCatalog: Send + Sync {
    fn get(&self, tax_id: TaxId) -> Option<Tax>;
    fn list(&self) -> Vec<Tax>;
}

impl<S> TaxCatalog for Arc<S>
where
    S: TaxCatalog + ?Sized,
{
    fn get(&self, tax_id: TaxId) -> Option<Tax> {
        (**self).get(tax_id)
    }

    fn list(&self) -> Vec<Tax> {
        (**self).list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_description() {
        let tax = Tax::new(TaxId::new(), "VAT 20%", TaxUse::Sale).with_description("V20");
        assert_eq!(tax.label(), "V20");
    }

    #[test]
    fn label_falls_back_to_name_when_description_is_empty() {
        let tax = Tax::new(TaxId::new(), "VAT 20%", TaxUse::Sale).with_description("");
        assert_eq!(tax.label(), "VAT 20%");

        let tax = Tax::new(TaxId::new(), "VAT 5.5%", TaxUse::Sale);
        assert_eq!(tax.label(), "VAT 5.5%");
    }

    #[test]
    fn child_taxes_are_never_eligible() {
        let parent = TaxId::new();
        let child = Tax::new(TaxId::new(), "Child", TaxUse::All).with_parent(parent);
        assert!(!child.is_root());
        assert!(!child.eligible_for(TaxUse::Sale));
        assert!(!child.eligible_for(TaxUse::Purchase));
    }

    #[test]
    fn type_of_use_restricts_side() {
        let sale = Tax::new(TaxId::new(), "Sale", TaxUse::Sale);
        let purchase = Tax::new(TaxId::new(), "Purchase", TaxUse::Purchase);
        let all = Tax::new(TaxId::new(), "Both", TaxUse::All);

        assert!(sale.eligible_for(TaxUse::Sale));
        assert!(!sale.eligible_for(TaxUse::Purchase));
        assert!(purchase.eligible_for(TaxUse::Purchase));
        assert!(!purchase.eligible_for(TaxUse::Sale));
        assert!(all.eligible_for(TaxUse::Sale));
        assert!(all.eligible_for(TaxUse::Purchase));
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let id = TaxId::new();
        let json = format!(r#"{{"id":"{id}","name":"VAT","type_tax_use":"purchase"}}"#);
        let tax: Tax = serde_json::from_str(&json).unwrap();
        assert_eq!(tax.id, id);
        assert_eq!(tax.type_tax_use, TaxUse::Purchase);
        assert!(tax.description.is_none());
        assert!(tax.is_root());
    }
}
