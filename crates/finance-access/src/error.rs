//! Access Error Types

use finance_core::PlanTier;
use thiserror::Error;

use crate::resolver::UpgradeCheck;

pub type Result<T> = std::result::Result<T, AccessError>;

/// Why a gated action was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The feature exists but needs a higher plan
    #[error("{feature} requires the {required} plan (current: {current})")]
    FeatureLocked {
        feature: String,
        required: PlanTier,
        current: PlanTier,
    },

    /// The feature is not in the feature table
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),
}

impl AccessError {
    pub(crate) fn from_check(feature: &str, check: &UpgradeCheck) -> Self {
        match check.required_plan {
            Some(required) => Self::FeatureLocked {
                feature: feature.to_string(),
                required,
                current: check.current_plan,
            },
            None => Self::UnknownFeature(feature.to_string()),
        }
    }

    /// Whether buying a higher plan would lift the restriction
    pub const fn is_upgradable(&self) -> bool {
        matches!(self, Self::FeatureLocked { .. })
    }
}
