//! # finance-core
//!
//! Domain model shared by the finance client crates: payments, subscription
//! plan tiers, and the contracts of the external collaborators (payment API,
//! notification sink).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   PaymentQuery    ┌──────────────────────┐
//! │  PaymentPoller   │──────────────────▶│  Payment API client  │
//! │ (finance-payments)│                  │  (HTTP / in-memory)  │
//! └────────┬─────────┘                   └──────────────────────┘
//!          │ Notifier
//!          ▼
//! ┌──────────────────┐   PlanTier        ┌──────────────────────┐
//! │  UI / toasts     │◀──────────────────│ PermissionResolver   │
//! └──────────────────┘                   │  (finance-access)    │
//!                                        └──────────────────────┘
//! ```
//!
//! The `PaymentQuery` and `PaymentService` traits let the poller and the
//! binary run against the real REST API or an in-memory double without code
//! changes.

pub mod error;
pub mod notify;
pub mod payment;
pub mod plan;
pub mod service;

pub use error::{PaymentError, Result};
pub use notify::{Notifier, TracingNotifier};
pub use payment::{NewPayment, Payment, PaymentId, PaymentMethod, PaymentStatus};
pub use plan::PlanTier;
pub use service::{PaymentFilter, PaymentQuery, PaymentService};
