//! In-Memory Billing Service
//!
//! For testing and demo purposes. Holds payments in a map and lets the caller
//! drive provider-side status transitions with `set_status`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use finance_core::{
    NewPayment, Payment, PaymentError, PaymentFilter, PaymentId, PaymentMethod, PaymentQuery, PaymentService,
    PaymentStatus, Result,
};

/// In-memory billing API
#[derive(Default)]
pub struct MemoryPaymentService {
    payments: RwLock<HashMap<PaymentId, Payment>>,
}

impl MemoryPaymentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a payment
    pub fn insert(&self, payment: Payment) {
        self.payments
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(payment.id.clone(), payment);
    }

    /// Simulate the provider moving a payment to `status`
    pub fn set_status(&self, id: &PaymentId, status: PaymentStatus) -> Result<Payment> {
        let mut payments = self.payments.write().unwrap_or_else(PoisonError::into_inner);
        let payment = payments
            .get_mut(id)
            .ok_or_else(|| PaymentError::NotFound(id.to_string()))?;

        tracing::debug!(payment_id = %id, from = %payment.status, to = %status, "Payment status changed");
        payment.status = status;
        Ok(payment.clone())
    }

    pub fn len(&self) -> usize {
        self.payments.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PaymentQuery for MemoryPaymentService {
    async fn get_status(&self, id: &PaymentId) -> Result<Payment> {
        self.payments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| PaymentError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl PaymentService for MemoryPaymentService {
    async fn create(&self, request: NewPayment) -> Result<Payment> {
        if request.value.is_sign_negative() || request.value.is_zero() {
            return Err(PaymentError::Rejected(format!("invalid payment value: {}", request.value)));
        }

        let id = PaymentId::new(format!("pay_{}", uuid::Uuid::new_v4().simple()));
        let mut payment = Payment::pending(id, request.method, request.value);
        payment.description = request.description;
        payment.due_date = request.due_date;
        payment.created_at = Utc::now();
        payment.invoice_url = Some(format!("https://billing.example.com/i/{}", payment.id));
        if request.method == PaymentMethod::Pix {
            payment.pix_copy_paste = Some(format!("00020126PIX{}", payment.id.as_str().to_uppercase()));
        }

        tracing::info!(payment_id = %payment.id, method = %payment.method, "Created payment");
        self.insert(payment.clone());
        Ok(payment)
    }

    async fn list(&self, filter: &PaymentFilter) -> Result<Vec<Payment>> {
        let payments = self.payments.read().unwrap_or_else(PoisonError::into_inner);
        let mut result: Vec<_> = payments.values().filter(|p| filter.matches(p)).cloned().collect();

        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn cancel(&self, id: &PaymentId) -> Result<Payment> {
        let mut payments = self.payments.write().unwrap_or_else(PoisonError::into_inner);
        let payment = payments
            .get_mut(id)
            .ok_or_else(|| PaymentError::NotFound(id.to_string()))?;

        if payment.status != PaymentStatus::Pending {
            return Err(PaymentError::Rejected(format!(
                "payment {id} is {} and cannot be cancelled",
                payment.status
            )));
        }

        payment.status = PaymentStatus::Cancelled;
        tracing::info!(payment_id = %id, "Cancelled payment");
        Ok(payment.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(method: PaymentMethod) -> NewPayment {
        NewPayment {
            method,
            value: dec!(29.90),
            description: Some("Pro plan - monthly".into()),
            due_date: None,
            plan: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_query() {
        let service = MemoryPaymentService::new();
        let created = service.create(request(PaymentMethod::Pix)).await.unwrap();

        assert_eq!(created.status, PaymentStatus::Pending);
        assert!(created.id.as_str().starts_with("pay_"));
        assert!(created.pix_copy_paste.is_some());

        let fetched = service.get_status(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_value() {
        let service = MemoryPaymentService::new();
        let mut bad = request(PaymentMethod::Boleto);
        bad.value = dec!(0);

        assert!(matches!(service.create(bad).await, Err(PaymentError::Rejected(_))));
        assert!(service.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_only_pending() {
        let service = MemoryPaymentService::new();
        let a = service.create(request(PaymentMethod::Boleto)).await.unwrap();
        let b = service.create(request(PaymentMethod::CreditCard)).await.unwrap();

        let cancelled = service.cancel(&a.id).await.unwrap();
        assert_eq!(cancelled.status, PaymentStatus::Cancelled);

        service.set_status(&b.id, PaymentStatus::Confirmed).unwrap();
        assert!(matches!(service.cancel(&b.id).await, Err(PaymentError::Rejected(_))));
        assert!(matches!(
            service.cancel(&PaymentId::from("pay_missing")).await,
            Err(PaymentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let service = MemoryPaymentService::new();
        let pix = service.create(request(PaymentMethod::Pix)).await.unwrap();
        service.create(request(PaymentMethod::Boleto)).await.unwrap();
        service.set_status(&pix.id, PaymentStatus::Received).unwrap();

        let all = service.list(&PaymentFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let received = service
            .list(&PaymentFilter { status: Some(PaymentStatus::Received), method: None })
            .await
            .unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].id, pix.id);

        let cards = service
            .list(&PaymentFilter { status: None, method: Some(PaymentMethod::CreditCard) })
            .await
            .unwrap();
        assert!(cards.is_empty());
    }
}
