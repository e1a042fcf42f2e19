//! Error Types

use thiserror::Error;

/// Result type alias for payment operations
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment API and domain errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Transport failure talking to the payment API
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    
    /// The API answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    
    /// Payment does not exist
    #[error("Payment not found: {0}")]
    NotFound(String),
    
    /// Unknown payment status string
    #[error("Invalid payment status: {0}")]
    InvalidStatus(String),
    
    /// Unknown payment method string
    #[error("Invalid payment method: {0}")]
    InvalidMethod(String),
    
    /// The operation is not allowed in the payment's current state
    #[error("Payment rejected: {0}")]
    Rejected(String),
    
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
    
    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PaymentError {
    /// Check if this error is worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
    
    /// Generic copy safe to show to an end user.
    ///
    /// Transport details never reach the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(_) => "Could not reach the payment service. Check your connection.",
            Self::Http { status, .. } if *status >= 500 => {
                "The payment service is temporarily unavailable. Please try again."
            }
            Self::NotFound(_) => "Payment not found.",
            Self::Rejected(_) => "This payment can no longer be changed.",
            Self::Config(_) => "Service configuration error.",
            _ => "An error occurred processing your payment.",
        }
    }
}
