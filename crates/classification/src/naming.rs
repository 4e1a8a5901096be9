//! Descriptive names for classifications minted by the factory.

/// Maximum length of a classification name, in characters.
pub const MAX_NAME_LENGTH: usize = 256;

const NO_TAXES: &str = "No taxes";
const NO_PURCHASE_SALE_PREFIX: &str = "No Purchase Taxes - Sale Taxes: ";
const PURCHASE_PREFIX: &str = "Purchase Taxes: ";
const NO_SALE_SUFFIX: &str = "- No Sale Taxes";
const SALE_SEPARATOR: &str = " - Sale Taxes: ";
const LABEL_SEPARATOR: &str = " + ";

/// Build a classification name from the labels of its taxes.
///
/// Labels are used in the order given; callers pass them in ascending tax id
/// order. The result never exceeds [`MAX_NAME_LENGTH`] characters.
pub fn synthesize_name<S: AsRef<str>>(sale_labels: &[S], purchase_labels: &[S]) -> String {
    let name = match (sale_labels.is_empty(), purchase_labels.is_empty()) {
        (true, true) => NO_TAXES.to_string(),
        (false, true) => format!("{NO_PURCHASE_SALE_PREFIX}{}", join(sale_labels)),
        (true, false) => format!("{PURCHASE_PREFIX}{}{NO_SALE_SUFFIX}", join(purchase_labels)),
        (false, false) => format!(
            "{PURCHASE_PREFIX}{}{SALE_SEPARATOR}{}",
            join(purchase_labels),
            join(sale_labels)
        ),
    };
    truncate(name)
}

/// Cut a name down to [`MAX_NAME_LENGTH`] characters.
pub fn truncate(name: String) -> String {
    match name.char_indices().nth(MAX_NAME_LENGTH) {
        Some((byte_idx, _)) => name[..byte_idx].to_string(),
        None => name,
    }
}

fn join<S: AsRef<str>>(labels: &[S]) -> String {
    labels
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn no_taxes_at_all() {
        assert_eq!(synthesize_name(&NONE, &NONE), "No taxes");
    }

    #[test]
    fn sale_only() {
        assert_eq!(
            synthesize_name(&["VAT 20%"], &NONE),
            "No Purchase Taxes - Sale Taxes: VAT 20%"
        );
        assert_eq!(
            synthesize_name(&["VAT 20%", "Eco"], &NONE),
            "No Purchase Taxes - Sale Taxes: VAT 20% + Eco"
        );
    }

    #[test]
    fn purchase_only_keeps_the_unspaced_suffix() {
        assert_eq!(
            synthesize_name(&NONE, &["Ded 20%"]),
            "Purchase Taxes: Ded 20%- No Sale Taxes"
        );
    }

    #[test]
    fn both_sides_list_purchase_first() {
        assert_eq!(
            synthesize_name(&["VAT 20%", "Eco"], &["Ded 20%"]),
            "Purchase Taxes: Ded 20% - Sale Taxes: VAT 20% + Eco"
        );
    }

    #[test]
    fn long_names_are_truncated_to_exactly_the_limit() {
        let labels: Vec<String> = (0..100).map(|i| format!("Tax number {i}")).collect();
        let name = synthesize_name(&labels, &[]);
        assert_eq!(name.chars().count(), MAX_NAME_LENGTH);
        assert!(name.starts_with("No Purchase Taxes - Sale Taxes: Tax number 0 + "));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let label = "é".repeat(300);
        let name = synthesize_name(&[label.as_str()], &[]);
        assert_eq!(name.chars().count(), MAX_NAME_LENGTH);
        assert!(name.ends_with('é'));
    }

    #[test]
    fn short_names_are_untouched() {
        let name = "x".repeat(MAX_NAME_LENGTH);
        assert_eq!(truncate(name.clone()), name);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: synthesized names never exceed the length limit.
            #[test]
            fn name_length_is_bounded(
                sale in proptest::collection::vec("\\PC{0,40}", 0..20),
                purchase in proptest::collection::vec("\\PC{0,40}", 0..20),
            ) {
                let name = synthesize_name(&sale, &purchase);
                prop_assert!(name.chars().count() <= MAX_NAME_LENGTH);
            }
        }
    }
}
