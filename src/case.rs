//! Naming-convention-insensitive identifier matching.

/// Fold an identifier to its lookup key: ASCII-lowercased with `_` and `-` removed.
/// e.g. "OrderItems", "orderItems", "order_items" and "ORDER-ITEMS" all fold to "orderitems".
pub fn fold_identifier(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// True when both identifiers fold to the same key.
pub fn same_identifier(a: &str, b: &str) -> bool {
    fold_identifier(a) == fold_identifier(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_separators() {
        assert_eq!(fold_identifier("OrderItems"), "orderitems");
        assert_eq!(fold_identifier("order_items"), "orderitems");
        assert_eq!(fold_identifier("orderItems"), "orderitems");
        assert_eq!(fold_identifier("ORDER-ITEMS"), "orderitems");
    }

    #[test]
    fn different_names_stay_different() {
        assert!(!same_identifier("orders", "order"));
        assert!(same_identifier("created_at", "CreatedAt"));
    }
}
