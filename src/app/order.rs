use std::collections::HashSet;

/// Case-insensitive key for a field name: trimmed and lowercased.
///
/// Matching is always done on this key; the literal spelling in the file is
/// never rewritten.
pub fn norm(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Result of merging a stored order with the names actually in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The working order: retained entries first, newly present names appended.
    pub order: Vec<String>,
    /// Entries of the stored order no longer present in the document.
    pub removed: Vec<String>,
    /// Present names that were not in the stored order.
    pub added: Vec<String>,
}

/// Merge `current` (the previously stored order) with `present` (the distinct
/// user field names in the document, first-spelling labels, document order).
///
/// Entries of `current` whose key is still present are kept in their existing
/// relative order under their current spelling; remaining present names are
/// appended under their present spelling. Nothing is ever inserted in the
/// middle.
pub fn reconcile(current: &[String], present: &[String]) -> Reconciled {
    let present_keys: HashSet<String> = present.iter().map(|n| norm(n)).collect();

    let mut order = Vec::new();
    let mut kept_keys = HashSet::new();
    for name in current {
        let key = norm(name);
        if present_keys.contains(&key) && kept_keys.insert(key) {
            order.push(name.clone());
        }
    }

    let mut added = Vec::new();
    for label in present {
        if kept_keys.insert(norm(label)) {
            order.push(label.clone());
            added.push(label.clone());
        }
    }

    let removed = current
        .iter()
        .filter(|n| !present_keys.contains(&norm(n)))
        .cloned()
        .collect();

    Reconciled { order, removed, added }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_norm_trims_and_lowercases() {
        assert_eq!(norm("  MPN "), "mpn");
        assert_eq!(norm("Supplier"), "supplier");
    }

    #[test]
    fn test_reconcile_keeps_appends_and_reports() {
        let r = reconcile(&v(&["X", "Y"]), &v(&["Y", "Z"]));
        assert_eq!(r.order, v(&["Y", "Z"]));
        assert_eq!(r.removed, v(&["X"]));
        assert_eq!(r.added, v(&["Z"]));
    }

    #[test]
    fn test_reconcile_preserves_relative_order_of_kept() {
        let r = reconcile(&v(&["C", "A", "B"]), &v(&["A", "B", "C", "D"]));
        assert_eq!(r.order, v(&["C", "A", "B", "D"]));
        assert!(r.removed.is_empty());
        assert_eq!(r.added, v(&["D"]));
    }

    #[test]
    fn test_reconcile_is_case_insensitive_and_keeps_stored_spelling() {
        let r = reconcile(&v(&["mpn"]), &v(&["MPN", "Supplier"]));
        assert_eq!(r.order, v(&["mpn", "Supplier"]));
        assert!(r.removed.is_empty());
        assert_eq!(r.added, v(&["Supplier"]));
    }

    #[test]
    fn test_reconcile_empty_current_yields_present() {
        let r = reconcile(&[], &v(&["A", "B"]));
        assert_eq!(r.order, v(&["A", "B"]));
        assert_eq!(r.added, v(&["A", "B"]));
        assert!(r.removed.is_empty());
    }

    #[test]
    fn test_reconcile_duplicate_keys_in_current_collapse() {
        let r = reconcile(&v(&["A", "a", "B"]), &v(&["A", "B"]));
        assert_eq!(r.order, v(&["A", "B"]));
        assert!(r.removed.is_empty());
    }
}
