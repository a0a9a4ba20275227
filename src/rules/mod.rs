//! Provider rule table: per-provider visit-type and id-type vocabularies
//! plus the field visibility matrix, with clinic-level dynamic overrides.
//!
//! Lookup is total: any code without an explicit catalog row resolves to
//! the search-all default entry, so callers never handle a missing
//! provider. Clinic-level overrides (currently the doctor-required flag)
//! come from the external clinic configuration and win over the static
//! table when present.

mod catalog;
mod entry;
mod resolver;

use std::collections::HashMap;
use std::sync::LazyLock;

pub use catalog::SEARCH_ALL_CODE;
pub use entry::{ExtraQuestion, FieldMatrix, FieldRule, PayloadField, ProviderRuleEntry};
pub use resolver::{EffectiveRules, ProviderOverride, RuleResolver};

static INDEX: LazyLock<HashMap<&'static str, &'static ProviderRuleEntry>> = LazyLock::new(|| {
    catalog::CATALOG
        .iter()
        .map(|entry| (entry.code, entry))
        .collect()
});

/// The static provider rule table.
///
/// Zero-sized handle over the built-in catalog; construct freely.
///
/// # Examples
///
/// ```
/// use eligibility_engine::rules::{ProviderRuleTable, SEARCH_ALL_CODE};
///
/// let table = ProviderRuleTable::new();
/// assert_eq!(table.lookup("TPA001").code, "TPA001");
/// // Unknown codes fall back to the search-all entry.
/// assert_eq!(table.lookup("TPA-UNKNOWN").code, SEARCH_ALL_CODE);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderRuleTable;

impl ProviderRuleTable {
    /// Creates a handle over the built-in catalog.
    pub fn new() -> Self {
        Self
    }

    /// Looks up the rule entry for `code`. Total: unknown codes (and the
    /// search-all code itself) resolve to the default entry.
    pub fn lookup(&self, code: &str) -> &'static ProviderRuleEntry {
        INDEX
            .get(code.trim())
            .copied()
            .unwrap_or(&catalog::DEFAULT_ENTRY)
    }

    /// Looks up an explicit catalog row, without the fallback.
    pub fn get(&self, code: &str) -> Option<&'static ProviderRuleEntry> {
        INDEX.get(code.trim()).copied()
    }

    /// Returns `true` when `code` selects the search-all flow, either
    /// explicitly or through the fallback.
    pub fn is_search_all(&self, code: &str) -> bool {
        self.lookup(code).code == SEARCH_ALL_CODE
    }

    /// Iterates every explicit catalog row.
    pub fn entries(&self) -> impl Iterator<Item = &'static ProviderRuleEntry> {
        catalog::CATALOG.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_total() {
        let table = ProviderRuleTable::new();
        for code in ["TPA001", "INS009", "DHPO", "", "GARBAGE", "tpa001"] {
            // Never panics, never returns nothing.
            let _ = table.lookup(code);
        }
    }

    #[test]
    fn known_codes_resolve_to_their_row() {
        let table = ProviderRuleTable::new();
        for entry in table.entries() {
            assert_eq!(table.lookup(entry.code).code, entry.code);
        }
    }

    #[test]
    fn unknown_code_falls_back_to_search_all() {
        let table = ProviderRuleTable::new();
        assert_eq!(table.lookup("TPA404X").code, SEARCH_ALL_CODE);
        assert!(table.is_search_all("TPA404X"));
        assert!(table.is_search_all(SEARCH_ALL_CODE));
        assert!(!table.is_search_all("TPA001"));
    }

    #[test]
    fn lookup_trims_whitespace() {
        let table = ProviderRuleTable::new();
        assert_eq!(table.lookup("  TPA001 ").code, "TPA001");
    }
}
