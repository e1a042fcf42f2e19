use std::sync::{Arc, Mutex};
use std::time::Duration;

use finance_core::{NewPayment, Notifier, PaymentMethod, PaymentService, PaymentStatus, PlanTier};
use finance_payments::{MemoryPaymentService, PaymentPoller, PollConfig, PollOutcome};
use rust_decimal_macros::dec;

#[derive(Default)]
struct Toasts(Mutex<Vec<(bool, String)>>);

impl Notifier for Toasts {
    fn show_success(&self, text: &str) {
        self.0.lock().unwrap().push((true, text.to_string()));
    }

    fn show_error(&self, text: &str) {
        self.0.lock().unwrap().push((false, text.to_string()));
    }
}

fn pro_subscription() -> NewPayment {
    NewPayment {
        method: PaymentMethod::Pix,
        value: dec!(29.90),
        description: Some("Pro plan".into()),
        due_date: None,
        plan: Some(PlanTier::Pro),
    }
}

fn config() -> PollConfig {
    PollConfig {
        interval: Duration::from_secs(3),
        max_attempts: 10,
        stop_on_failure: true,
    }
}

// ── created payment settles while the poller is watching ───────────────────

#[tokio::test(start_paused = true)]
async fn poller_sees_provider_confirmation() {
    let service = Arc::new(MemoryPaymentService::new());
    let toasts = Arc::new(Toasts::default());
    let payment = service.create(pro_subscription()).await.unwrap();

    let mut poller = PaymentPoller::new(service.clone(), toasts.clone(), config());
    poller.start_polling(payment.id.clone(), |_| {});

    // two pending checks, then the provider settles the charge
    tokio::time::sleep(Duration::from_millis(7000)).await;
    assert!(poller.is_active());
    assert_eq!(poller.attempts(), 2);
    service.set_status(&payment.id, PaymentStatus::Received).unwrap();

    let outcome = poller.wait().await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.payment().unwrap().id, payment.id);
    assert_eq!(
        toasts.0.lock().unwrap().as_slice(),
        [(true, "Payment confirmed!".to_string())]
    );
}

// ── user cancels the charge from another tab ──────────────────────────────

#[tokio::test(start_paused = true)]
async fn poller_stops_on_cancellation() {
    let service = Arc::new(MemoryPaymentService::new());
    let toasts = Arc::new(Toasts::default());
    let payment = service.create(pro_subscription()).await.unwrap();

    let mut poller = PaymentPoller::new(service.clone(), toasts.clone(), config());
    poller.start_polling(payment.id.clone(), |_| {});

    tokio::time::sleep(Duration::from_millis(4000)).await;
    service.cancel(&payment.id).await.unwrap();

    let outcome = poller.wait().await.unwrap();
    assert!(matches!(outcome, PollOutcome::Failed(ref p) if p.status == PaymentStatus::Cancelled));
    assert_eq!(poller.attempts(), 0, "finished session is released");
    assert!(!toasts.0.lock().unwrap()[0].0);
}

// ── unknown payment keeps failing until the budget runs out ───────────────

#[tokio::test(start_paused = true)]
async fn missing_payment_times_out() {
    let service = Arc::new(MemoryPaymentService::new());
    let toasts = Arc::new(Toasts::default());

    let mut poller = PaymentPoller::new(service, toasts.clone(), config());
    poller.start_polling("pay_does_not_exist", |_| {});

    let outcome = poller.wait().await.unwrap();
    assert!(matches!(outcome, PollOutcome::TimedOut { attempts: 10, .. }));
    assert!(toasts.0.lock().unwrap().is_empty());
}
