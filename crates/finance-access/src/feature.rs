//! Feature Table
//!
//! Static mapping from feature key to the minimum plan that unlocks it.

use std::collections::BTreeMap;

use finance_core::PlanTier;

const STANDARD_FEATURES: &[(&str, PlanTier)] = &[
    // Core bookkeeping
    ("ACCOUNTS", PlanTier::Free),
    ("CATEGORIES", PlanTier::Free),
    ("DASHBOARD", PlanTier::Free),
    ("TRANSACTIONS", PlanTier::Free),
    // Planning and analysis
    ("BUDGETS", PlanTier::Pro),
    ("CREDIT_CARDS", PlanTier::Pro),
    ("EXPORT_DATA", PlanTier::Pro),
    ("GOALS", PlanTier::Pro),
    ("PERIOD_FILTERS", PlanTier::Pro),
    ("RECURRING_TRANSACTIONS", PlanTier::Pro),
    ("REPORTS", PlanTier::Pro),
    // Integrations
    ("API_ACCESS", PlanTier::Premium),
    ("BANK_ACCOUNTS", PlanTier::Premium),
    ("INVESTMENTS", PlanTier::Premium),
    ("MULTI_CURRENCY", PlanTier::Premium),
    ("PRIORITY_SUPPORT", PlanTier::Premium),
];

/// Feature key → minimum plan tier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureTable {
    features: BTreeMap<String, PlanTier>,
}

impl FeatureTable {
    /// The table shipped with the app
    pub fn standard() -> Self {
        Self::from_entries(STANDARD_FEATURES.iter().copied())
    }

    /// Build a custom table. Later entries override earlier ones.
    pub fn from_entries<K: Into<String>>(entries: impl IntoIterator<Item = (K, PlanTier)>) -> Self {
        Self {
            features: entries.into_iter().map(|(k, tier)| (k.into(), tier)).collect(),
        }
    }

    /// Minimum tier for `feature`, `None` if the feature is unknown
    pub fn required_tier(&self, feature: &str) -> Option<PlanTier> {
        self.features.get(feature).copied()
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.features.contains_key(feature)
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, PlanTier)> {
        self.features.iter().map(|(k, tier)| (k.as_str(), *tier))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = FeatureTable::standard();
        assert_eq!(table.len(), STANDARD_FEATURES.len());
        assert_eq!(table.required_tier("DASHBOARD"), Some(PlanTier::Free));
        assert_eq!(table.required_tier("REPORTS"), Some(PlanTier::Pro));
        assert_eq!(table.required_tier("BANK_ACCOUNTS"), Some(PlanTier::Premium));
        assert_eq!(table.required_tier("dashboard"), None);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let table = FeatureTable::standard();
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_custom_entries_override() {
        let table = FeatureTable::from_entries([("EXPORT", PlanTier::Pro), ("EXPORT", PlanTier::Free)]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.required_tier("EXPORT"), Some(PlanTier::Free));
    }
}
