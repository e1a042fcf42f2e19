//! Permission Resolver
//!
//! Stateless checks of feature keys against the feature table and whatever
//! plan the subscription currently holds.

use std::sync::Arc;

use finance_core::PlanTier;
use serde::Serialize;

use crate::error::{AccessError, Result};
use crate::feature::FeatureTable;
use crate::message::FeatureBlockMessage;
use crate::subscription::PlanSource;

/// Result of `check_upgrade_required`, used to decide on an upgrade prompt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeCheck {
    /// A higher plan would unlock the feature
    pub upgrade_required: bool,
    
    /// Minimum plan, `None` for unknown features
    pub required_plan: Option<PlanTier>,
    
    pub current_plan: PlanTier,
    
    pub has_access: bool,
}

/// Resolves feature access for the current subscription
#[derive(Clone)]
pub struct PermissionResolver {
    table: Arc<FeatureTable>,
    plan: Arc<dyn PlanSource>,
}

impl PermissionResolver {
    pub fn new(table: Arc<FeatureTable>, plan: Arc<dyn PlanSource>) -> Self {
        Self { table, plan }
    }
    
    /// Resolver over the built-in feature table
    pub fn standard(plan: Arc<dyn PlanSource>) -> Self {
        Self::new(Arc::new(FeatureTable::standard()), plan)
    }
    
    pub fn table(&self) -> &FeatureTable {
        &self.table
    }
    
    /// Tier of the plan held right now
    pub fn current_tier(&self) -> PlanTier {
        self.plan.tier()
    }
    
    /// Whether the user is on `plan`. Aliases are resolved on both sides.
    pub fn is_plan(&self, plan: &str) -> bool {
        PlanTier::parse(plan).is_some_and(|tier| tier == self.current_tier())
    }
    
    /// Whether the current plan unlocks `feature`.
    ///
    /// Features missing from the table are denied.
    pub fn has_feature_access(&self, feature: &str) -> bool {
        self.required_tier(feature)
            .is_some_and(|required| self.current_tier().rank() >= required.rank())
    }
    
    pub fn check_upgrade_required(&self, feature: &str) -> UpgradeCheck {
        let current_plan = self.current_tier();
        let required_plan = self.required_tier(feature);
        let has_access = required_plan.is_some_and(|required| current_plan.rank() >= required.rank());
        
        UpgradeCheck {
            upgrade_required: required_plan.is_some() && !has_access,
            required_plan,
            current_plan,
            has_access,
        }
    }
    
    /// Dialog copy for a locked feature
    pub fn feature_block_message(&self, feature: &str) -> FeatureBlockMessage {
        FeatureBlockMessage::for_feature(feature, self.table.required_tier(feature))
    }
    
    /// Guard for gated actions
    pub fn require_feature(&self, feature: &str) -> Result<()> {
        let check = self.check_upgrade_required(feature);
        if check.has_access {
            Ok(())
        } else {
            Err(AccessError::from_check(feature, &check))
        }
    }
    
    /// Features the current plan unlocks, in key order
    pub fn available_features(&self) -> Vec<&str> {
        let rank = self.current_tier().rank();
        self.table
            .iter()
            .filter(|(_, required)| rank >= required.rank())
            .map(|(feature, _)| feature)
            .collect()
    }
    
    /// Features the current plan does not unlock, in key order
    pub fn locked_features(&self) -> Vec<&str> {
        let rank = self.current_tier().rank();
        self.table
            .iter()
            .filter(|(_, required)| rank < required.rank())
            .map(|(feature, _)| feature)
            .collect()
    }
    
    fn required_tier(&self, feature: &str) -> Option<PlanTier> {
        let required = self.table.required_tier(feature);
        if required.is_none() {
            tracing::warn!(feature, "Feature not in feature table, denying access");
        }
        required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::SubscriptionState;

    fn resolver(plan: PlanTier) -> PermissionResolver {
        PermissionResolver::standard(Arc::new(plan))
    }

    #[test]
    fn test_dashboard_open_to_all() {
        for tier in PlanTier::ALL {
            assert!(resolver(tier).has_feature_access("DASHBOARD"), "{tier}");
        }
    }

    #[test]
    fn test_bank_accounts_premium_only() {
        assert!(!resolver(PlanTier::Free).has_feature_access("BANK_ACCOUNTS"));
        assert!(!resolver(PlanTier::Pro).has_feature_access("BANK_ACCOUNTS"));
        assert!(resolver(PlanTier::Premium).has_feature_access("BANK_ACCOUNTS"));
    }

    #[test]
    fn test_unknown_feature_denied() {
        for tier in PlanTier::ALL {
            assert!(!resolver(tier).has_feature_access("UNDEFINED_FEATURE_XYZ"));
        }
    }

    #[test]
    fn test_is_plan_resolves_aliases() {
        let pro = resolver(PlanTier::Pro);
        assert!(pro.is_plan("PRO"));
        assert!(pro.is_plan("PROFESSIONAL"));
        assert!(pro.is_plan("professional"));
        assert!(!pro.is_plan("PREMIUM"));
        assert!(!pro.is_plan("gold"));

        let aliased = PermissionResolver::standard(Arc::new(SubscriptionState::with_plan("Professional")));
        assert_eq!(aliased.current_tier(), PlanTier::Pro);
        assert_eq!(aliased.is_plan("PRO"), pro.is_plan("PRO"));
        assert_eq!(aliased.is_plan("PROFESSIONAL"), pro.is_plan("PROFESSIONAL"));
    }

    #[test]
    fn test_upgrade_check() {
        let check = resolver(PlanTier::Free).check_upgrade_required("REPORTS");
        assert_eq!(
            check,
            UpgradeCheck {
                upgrade_required: true,
                required_plan: Some(PlanTier::Pro),
                current_plan: PlanTier::Free,
                has_access: false,
            }
        );

        let check = resolver(PlanTier::Premium).check_upgrade_required("REPORTS");
        assert!(check.has_access);
        assert!(!check.upgrade_required);

        let check = resolver(PlanTier::Free).check_upgrade_required("UNDEFINED_FEATURE_XYZ");
        assert!(!check.has_access);
        assert!(!check.upgrade_required);
        assert_eq!(check.required_plan, None);
    }

    #[test]
    fn test_require_feature() {
        let free = resolver(PlanTier::Free);
        assert!(free.require_feature("TRANSACTIONS").is_ok());

        let err = free.require_feature("INVESTMENTS").unwrap_err();
        assert!(err.is_upgradable());
        assert_eq!(err.to_string(), "INVESTMENTS requires the PREMIUM plan (current: FREE)");

        let err = free.require_feature("NOPE").unwrap_err();
        assert_eq!(err, AccessError::UnknownFeature("NOPE".into()));
    }

    #[test]
    fn test_feature_partition() {
        let table = FeatureTable::standard();
        for tier in PlanTier::ALL {
            let r = resolver(tier);
            let available = r.available_features();
            let locked = r.locked_features();

            assert_eq!(available.len() + locked.len(), table.len());
            assert!(available.iter().all(|f| r.has_feature_access(f)));
            assert!(locked.iter().all(|f| !r.has_feature_access(f)));
        }

        assert!(resolver(PlanTier::Premium).locked_features().is_empty());
        assert!(resolver(PlanTier::Free).locked_features().contains(&"BUDGETS"));
    }

    #[test]
    fn test_plan_changes_apply_immediately() {
        let subscription = Arc::new(SubscriptionState::with_plan("FREE"));
        let r = PermissionResolver::standard(subscription.clone());
        assert!(!r.has_feature_access("GOALS"));

        subscription.set_plan("PRO");
        assert!(r.has_feature_access("GOALS"));
    }

    #[test]
    fn test_block_message_is_deterministic() {
        let r = resolver(PlanTier::Free);
        let first = r.feature_block_message("INVESTMENTS");
        assert_eq!(first, r.feature_block_message("INVESTMENTS"));
        assert_eq!(first.required_plan, Some(PlanTier::Premium));

        let generic = r.feature_block_message("API_ACCESS");
        assert_eq!(generic.title, "Api access is a Premium feature");
    }
}
