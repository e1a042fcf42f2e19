//! Upgrade Prompt Copy
//!
//! Dialog content shown when a locked feature is opened. High-value features
//! get dedicated copy; everything else uses a generic template.

use finance_core::PlanTier;
use serde::Serialize;

/// Content of the "upgrade to unlock" dialog
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureBlockMessage {
    pub title: String,
    pub message: String,
    
    /// Selling points listed under the message
    pub features: Vec<String>,
    
    /// Plan to advertise; `None` for unknown features
    pub required_plan: Option<PlanTier>,
}

impl FeatureBlockMessage {
    /// Copy for `feature`. Same input, same output.
    pub fn for_feature(feature: &str, required_plan: Option<PlanTier>) -> Self {
        match canned(feature) {
            Some((title, message, features)) => Self {
                title: title.to_string(),
                message: message.to_string(),
                features: features.iter().map(ToString::to_string).collect(),
                required_plan,
            },
            None => Self::generic(feature, required_plan),
        }
    }
    
    fn generic(feature: &str, required_plan: Option<PlanTier>) -> Self {
        let label = feature_label(feature);
        match required_plan {
            Some(plan) => Self {
                title: format!("{label} is a {} feature", plan.display_name()),
                message: format!(
                    "Upgrade to the {} plan to unlock {label} and more tools to manage your money.",
                    plan.display_name()
                ),
                features: vec![
                    format!("Full access to {label}"),
                    "Everything in your current plan".to_string(),
                    "Cancel anytime".to_string(),
                ],
                required_plan,
            },
            None => Self {
                title: "Feature unavailable".to_string(),
                message: format!("{label} is not available for your account."),
                features: Vec::new(),
                required_plan,
            },
        }
    }
}

type Canned = (&'static str, &'static str, [&'static str; 3]);

fn canned(feature: &str) -> Option<Canned> {
    let copy: Canned = match feature {
        "BANK_ACCOUNTS" => (
            "Connect your bank accounts",
            "Sync balances and transactions automatically with the Premium plan.",
            [
                "Automatic transaction import",
                "Balances updated daily",
                "Multiple institutions in one place",
            ],
        ),
        "INVESTMENTS" => (
            "Track your investments",
            "Follow your portfolio next to your everyday finances with the Premium plan.",
            [
                "Portfolio performance over time",
                "Asset allocation breakdown",
                "Dividend and income tracking",
            ],
        ),
        "REPORTS" => (
            "Unlock detailed reports",
            "See where your money goes with the Pro plan.",
            [
                "Spending by category and period",
                "Income vs. expense trends",
                "Month-over-month comparisons",
            ],
        ),
        "BUDGETS" => (
            "Plan with budgets",
            "Set monthly limits per category with the Pro plan.",
            [
                "Unlimited budgets",
                "Alerts before you overspend",
                "Rollover of unused amounts",
            ],
        ),
        "GOALS" => (
            "Reach your savings goals",
            "Create goals and track your progress with the Pro plan.",
            [
                "Unlimited savings goals",
                "Projected completion dates",
                "Contribution reminders",
            ],
        ),
        "EXPORT_DATA" => (
            "Export your data",
            "Download your transactions and reports with the Pro plan.",
            ["CSV and spreadsheet export", "PDF reports", "Full transaction history"],
        ),
        _ => return None,
    };
    Some(copy)
}

/// `RECURRING_TRANSACTIONS` → `Recurring transactions`
fn feature_label(feature: &str) -> String {
    let lower = feature.replace('_', " ").to_lowercase();
    let mut chars = lower.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
