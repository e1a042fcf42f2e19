//! Payment Records
//!
//! Payments are owned by the remote billing API; the client only reads them
//! and requests transitions (create, cancel).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PaymentError;
use crate::plan::PlanTier;

/// Opaque payment identifier issued by the billing API
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaymentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PaymentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Payment lifecycle status as reported by the payment provider
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Received,
    Confirmed,
    Overdue,
    Cancelled,
}

impl PaymentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Received => "RECEIVED",
            Self::Confirmed => "CONFIRMED",
            Self::Overdue => "OVERDUE",
            Self::Cancelled => "CANCELLED",
        }
    }
    
    /// Money has arrived. The only successful exits of a poll session.
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Confirmed | Self::Received)
    }
    
    /// The payment will never be paid without a new charge.
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Cancelled | Self::Overdue)
    }
    
    /// No further transition is expected.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "RECEIVED" => Ok(Self::Received),
            "CONFIRMED" => Ok(Self::Confirmed),
            "OVERDUE" => Ok(Self::Overdue),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(PaymentError::InvalidStatus(s.to_string())),
        }
    }
}

/// How the customer pays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Instant transfer via QR code / copy-paste key
    Pix,
    /// Bank slip, settles in 1-3 business days
    Boleto,
    CreditCard,
}

impl PaymentMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pix => "PIX",
            Self::Boleto => "BOLETO",
            Self::CreditCard => "CREDIT_CARD",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "PIX" => Ok(Self::Pix),
            "BOLETO" => Ok(Self::Boleto),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            _ => Err(PaymentError::InvalidMethod(s.to_string())),
        }
    }
}

/// A payment record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Provider-issued identifier
    pub id: PaymentId,
    
    /// Current status
    pub status: PaymentStatus,
    
    /// Billing method
    pub method: PaymentMethod,
    
    /// Charged amount
    pub value: Decimal,
    
    /// Free-form description shown on the invoice
    #[serde(default)]
    pub description: Option<String>,
    
    /// Due date (boleto and PIX charges expire after it)
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    
    /// Hosted invoice page
    #[serde(default)]
    pub invoice_url: Option<String>,
    
    /// PIX copy-paste key, only for `PaymentMethod::Pix`
    #[serde(default)]
    pub pix_copy_paste: Option<String>,
}

impl Payment {
    /// Create a pending payment
    pub fn pending(id: impl Into<PaymentId>, method: PaymentMethod, value: Decimal) -> Self {
        Self {
            id: id.into(),
            status: PaymentStatus::Pending,
            method,
            value,
            description: None,
            due_date: None,
            created_at: Utc::now(),
            invoice_url: None,
            pix_copy_paste: None,
        }
    }
    
    /// Copy of this payment with a different status
    #[must_use]
    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }
    
    /// Pending and past its due date on `today`
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.status == PaymentStatus::Pending && self.due_date.is_some_and(|due| today > due)
    }
}

/// Request to create a payment
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub method: PaymentMethod,
    pub value: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    
    /// Plan purchased by this payment, if it is a subscription charge
    #[serde(default)]
    pub plan: Option<PlanTier>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_classification() {
        assert!(PaymentStatus::Confirmed.is_success());
        assert!(PaymentStatus::Received.is_success());
        assert!(!PaymentStatus::Pending.is_success());
        assert!(!PaymentStatus::Cancelled.is_success());

        assert!(PaymentStatus::Overdue.is_failure());
        assert!(PaymentStatus::Cancelled.is_failure());

        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(PaymentStatus::Overdue.is_terminal());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("confirmed".parse::<PaymentStatus>().unwrap(), PaymentStatus::Confirmed);
        assert_eq!(" PENDING ".parse::<PaymentStatus>().unwrap(), PaymentStatus::Pending);
        assert!("REFUNDED".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("credit-card".parse::<PaymentMethod>().unwrap(), PaymentMethod::CreditCard);
        assert_eq!("pix".parse::<PaymentMethod>().unwrap(), PaymentMethod::Pix);
        assert!("cash".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_wire_format() {
        let json = r#"{
            "id": "pay_123",
            "status": "RECEIVED",
            "method": "CREDIT_CARD",
            "value": "49.90",
            "createdAt": "2026-01-15T12:00:00Z"
        }"#;

        let payment: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.id.as_str(), "pay_123");
        assert_eq!(payment.status, PaymentStatus::Received);
        assert_eq!(payment.method, PaymentMethod::CreditCard);
        assert_eq!(payment.value, dec!(49.90));
        assert!(payment.due_date.is_none());
    }

    #[test]
    fn test_past_due() {
        let mut payment = Payment::pending("pay_1", PaymentMethod::Boleto, dec!(19.90));
        payment.due_date = NaiveDate::from_ymd_opt(2026, 3, 10);

        let before = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let after = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();

        assert!(!payment.is_past_due(before));
        assert!(payment.is_past_due(after));
        assert!(!payment.with_status(PaymentStatus::Confirmed).is_past_due(after));
    }
}
