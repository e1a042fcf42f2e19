//! # finance-access
//!
//! Decides which parts of the app the current subscription unlocks.
//!
//! Every feature has a minimum plan tier. Access is granted when the user's
//! tier ranks at least as high:
//!
//! ```text
//!              FREE        PRO        PREMIUM
//! DASHBOARD     ✓           ✓           ✓
//! BUDGETS       ✗           ✓           ✓
//! BANK_ACCOUNTS ✗           ✗           ✓
//! ```
//!
//! Unknown feature names are always denied.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use finance_access::{FeatureTable, PermissionResolver, SubscriptionState};
//!
//! let subscription = Arc::new(SubscriptionState::with_plan("professional"));
//! let resolver = PermissionResolver::new(Arc::new(FeatureTable::standard()), subscription);
//!
//! if !resolver.has_feature_access("BANK_ACCOUNTS") {
//!     let prompt = resolver.feature_block_message("BANK_ACCOUNTS");
//!     // show upgrade dialog
//! }
//! ```

mod error;
mod feature;
mod message;
mod resolver;
mod subscription;

pub use error::{AccessError, Result};
pub use feature::FeatureTable;
pub use message::FeatureBlockMessage;
pub use resolver::{PermissionResolver, UpgradeCheck};
pub use subscription::{PlanSource, SubscriptionState};
