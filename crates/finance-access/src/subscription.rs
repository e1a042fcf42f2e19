//! Subscription State
//!
//! The resolver never caches a tier; it reads the plan string from a
//! `PlanSource` on every call, so plan changes apply immediately.

use std::sync::{PoisonError, RwLock};

use finance_core::PlanTier;

/// Read-only view of the user's current plan name
pub trait PlanSource: Send + Sync {
    /// Raw plan name as stored by the subscription, if any
    fn plan_name(&self) -> Option<String>;
    
    /// Normalized tier
    fn tier(&self) -> PlanTier {
        PlanTier::normalize(self.plan_name().as_deref())
    }
}

/// A fixed tier is its own plan source
impl PlanSource for PlanTier {
    fn plan_name(&self) -> Option<String> {
        Some(self.as_str().to_string())
    }
    
    fn tier(&self) -> PlanTier {
        *self
    }
}

/// Caller-owned subscription record
#[derive(Debug, Default)]
pub struct SubscriptionState {
    plan: RwLock<Option<String>>,
}

impl SubscriptionState {
    /// No subscription loaded yet
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn with_plan(plan: impl Into<String>) -> Self {
        Self {
            plan: RwLock::new(Some(plan.into())),
        }
    }
    
    /// Replace the plan, e.g. after a payment was confirmed
    pub fn set_plan(&self, plan: impl Into<String>) {
        let plan = plan.into();
        tracing::info!(plan = %plan, "Subscription plan updated");
        *self.plan.write().unwrap_or_else(PoisonError::into_inner) = Some(plan);
    }
    
    /// Forget the plan (sign-out)
    pub fn clear(&self) {
        *self.plan.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl PlanSource for SubscriptionState {
    fn plan_name(&self) -> Option<String> {
        self.plan.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_tier_tracks_updates() {
        let state = SubscriptionState::new();
        assert_eq!(state.tier(), PlanTier::Free);

        state.set_plan("enterprise");
        assert_eq!(state.plan_name().as_deref(), Some("enterprise"));
        assert_eq!(state.tier(), PlanTier::Premium);

        state.clear();
        assert_eq!(state.tier(), PlanTier::Free);
    }

    #[test]
    fn test_fixed_tier_source() {
        assert_eq!(PlanTier::Pro.tier(), PlanTier::Pro);
        assert_eq!(PlanTier::Pro.plan_name().as_deref(), Some("PRO"));
    }
}
