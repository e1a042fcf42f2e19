//! Subscription Plan Tiers
//!
//! Plans are ranked `Free < Pro < Premium`. The billing backend and older
//! clients use several names for the same tier, so every plan string is
//! normalized here before any comparison.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Subscription plan tier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Premium,
}

impl PlanTier {
    /// All tiers, lowest first
    pub const ALL: [Self; 3] = [Self::Free, Self::Pro, Self::Premium];

    /// Ordinal used for feature gating
    pub const fn rank(self) -> u8 {
        match self {
            Self::Free => 0,
            Self::Pro => 1,
            Self::Premium => 2,
        }
    }
    
    /// Canonical name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Pro => "PRO",
            Self::Premium => "PREMIUM",
        }
    }
    
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Pro => "Pro",
            Self::Premium => "Premium",
        }
    }
    
    pub const fn is_paid(self) -> bool {
        !matches!(self, Self::Free)
    }
    
    /// Parse a plan name, resolving aliases. Case-insensitive.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_uppercase().as_str() {
            "FREE" | "BASIC" | "GRATUITO" => Some(Self::Free),
            "PRO" | "PROFESSIONAL" => Some(Self::Pro),
            "PREMIUM" | "ENTERPRISE" => Some(Self::Premium),
            _ => None,
        }
    }
    
    /// Resolve the tier of whatever plan string the subscription holds.
    ///
    /// Missing and unrecognized plans grant the lowest tier.
    pub fn normalize(name: Option<&str>) -> Self {
        match name {
            None => Self::Free,
            Some(raw) if raw.trim().is_empty() => Self::Free,
            Some(raw) => Self::parse(raw).unwrap_or_else(|| {
                tracing::warn!(plan = %raw, "Unknown plan name, treating as FREE");
                Self::Free
            }),
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown plan: {s}"))
    }
}

impl TryFrom<String> for PlanTier {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
