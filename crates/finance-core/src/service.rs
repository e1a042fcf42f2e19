//! Payment API Contracts
//!
//! `PaymentQuery` is the only capability the poller needs. `PaymentService`
//! adds the remaining operations of the billing API.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use finance_core::{PaymentQuery, PaymentId};
//!
//! let payment = client.get_status(&PaymentId::from("pay_123")).await?;
//! if payment.status.is_success() {
//!     // unlock the purchased plan
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::payment::{NewPayment, Payment, PaymentId, PaymentMethod, PaymentStatus};

/// Read the current state of a payment.
///
/// Implementations perform a single request; retrying is the caller's job.
#[async_trait]
pub trait PaymentQuery: Send + Sync {
    async fn get_status(&self, id: &PaymentId) -> Result<Payment>;
}

/// Filter for listing payments
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
}

impl PaymentFilter {
    pub fn matches(&self, payment: &Payment) -> bool {
        self.status.is_none_or(|s| s == payment.status)
            && self.method.is_none_or(|m| m == payment.method)
    }
}

/// Full billing API (Strategy pattern)
#[async_trait]
pub trait PaymentService: PaymentQuery {
    /// Create a new pending payment
    async fn create(&self, request: NewPayment) -> Result<Payment>;
    
    /// List payments, newest first
    async fn list(&self, filter: &PaymentFilter) -> Result<Vec<Payment>>;
    
    /// Cancel a pending payment
    async fn cancel(&self, id: &PaymentId) -> Result<Payment>;
}
