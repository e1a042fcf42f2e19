//! Billing API Client
//!
//! `PaymentService` over the finance backend's REST API.

use std::time::Duration;

use async_trait::async_trait;
use finance_core::{
    NewPayment, Payment, PaymentError, PaymentFilter, PaymentId, PaymentQuery, PaymentService, Result,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Billing API configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://api.example.com/v1`
    pub base_url: String,

    /// Bearer token of the signed-in user
    pub token: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".into(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Read `FINANCE_API_URL`, `FINANCE_API_TOKEN`, `FINANCE_API_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("FINANCE_API_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| PaymentError::Config("FINANCE_API_URL not set".into()))?;

        let timeout_secs = match lookup("FINANCE_API_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                PaymentError::Config(format!("FINANCE_API_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => Self::default().timeout_secs,
        };

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            token: lookup("FINANCE_API_TOKEN").filter(|t| !t.is_empty()),
            timeout_secs,
        })
    }
}

/// HTTP implementation of the billing API
pub struct HttpPaymentClient {
    client: Client,
    config: ApiConfig,
}

impl HttpPaymentClient {
    /// Create a client from configuration
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ApiConfig::from_env()?)
    }

    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, subject: &str) -> Result<T> {
        let response = self.authorize(request).send().await?;
        let response = Self::check_status(response, subject).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: Response, subject: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), subject, "Billing API request rejected");

        Err(match status {
            StatusCode::NOT_FOUND => PaymentError::NotFound(subject.to_string()),
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => PaymentError::Rejected(body),
            _ => PaymentError::Http {
                status: status.as_u16(),
                body,
            },
        })
    }
}

#[async_trait]
impl PaymentQuery for HttpPaymentClient {
    async fn get_status(&self, id: &PaymentId) -> Result<Payment> {
        let url = self.url(&format!("/payments/{id}/status"));
        self.send(self.client.get(url), id.as_str()).await
    }
}

#[async_trait]
impl PaymentService for HttpPaymentClient {
    async fn create(&self, request: NewPayment) -> Result<Payment> {
        let payment: Payment = self
            .send(self.client.post(self.url("/payments")).json(&request), "payments")
            .await?;

        tracing::info!(
            payment_id = %payment.id,
            method = %payment.method,
            value = %payment.value,
            "Created payment"
        );
        Ok(payment)
    }

    async fn list(&self, filter: &PaymentFilter) -> Result<Vec<Payment>> {
        let request = self.client.get(self.url("/payments")).query(filter);
        self.send(request, "payments").await
    }

    async fn cancel(&self, id: &PaymentId) -> Result<Payment> {
        let url = self.url(&format!("/payments/{id}/cancel"));
        let payment: Payment = self.send(self.client.post(url), id.as_str()).await?;

        tracing::info!(payment_id = %id, status = %payment.status, "Cancelled payment");
        Ok(payment)
    }
}
