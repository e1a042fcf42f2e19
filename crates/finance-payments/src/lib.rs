//! # finance-payments
//!
//! Payment status polling and billing API clients.
//!
//! ## Payment Flow
//!
//! ```text
//! ┌─────────────┐  create   ┌──────────────┐  poll status  ┌──────────────┐
//! │  Checkout   │──────────▶│ Billing API  │◀──────────────│ PaymentPoller│
//! │  (PIX/card) │           │              │               │  (3s × 100)  │
//! └─────────────┘           └──────────────┘               └──────┬───────┘
//!                                                                 │ toast
//!                                                                 ▼
//!                                                          "Payment confirmed!"
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use finance_payments::{HttpPaymentClient, PaymentPoller, PollConfig};
//! use finance_core::TracingNotifier;
//!
//! let client = Arc::new(HttpPaymentClient::from_env()?);
//! let mut poller = PaymentPoller::new(client, Arc::new(TracingNotifier), PollConfig::default());
//!
//! poller.start_polling(payment.id.clone(), |outcome| {
//!     if outcome.is_success() {
//!         // refresh the subscription
//!     }
//! });
//! ```

mod http;
mod memory;
mod poller;

pub use http::{ApiConfig, HttpPaymentClient};
pub use memory::MemoryPaymentService;
pub use poller::{PaymentPoller, PollConfig, PollOutcome};
