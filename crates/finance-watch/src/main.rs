//! finance-watch
//!
//! Headless companion of the finance client.
//!
//! ```text
//! finance-watch poll <payment-id>   wait for a payment to settle
//! finance-watch features [plan]     show what a plan unlocks
//! ```
//!
//! Configuration comes from the environment (or `.env`):
//! `FINANCE_API_URL`, `FINANCE_API_TOKEN`, `FINANCE_API_TIMEOUT_SECS`,
//! `FINANCE_POLL_INTERVAL_MS`, `FINANCE_POLL_MAX_ATTEMPTS`,
//! `FINANCE_POLL_STOP_ON_FAILURE`, `FINANCE_PLAN`.

use std::sync::Arc;

use anyhow::{Context, bail};
use finance_access::{PermissionResolver, SubscriptionState};
use finance_core::{Payment, PaymentId, PaymentMethod, PaymentQuery, PaymentStatus, TracingNotifier};
use finance_payments::{HttpPaymentClient, MemoryPaymentService, PaymentPoller, PollConfig, PollOutcome};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: finance-watch poll <payment-id> | finance-watch features [plan]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment before reading RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("poll") => {
            let id = args.get(1).context(USAGE)?;
            poll(PaymentId::from(id.as_str())).await
        }
        Some("features") => {
            features(args.get(1).cloned());
            Ok(())
        }
        _ => bail!(USAGE),
    }
}

async fn poll(payment_id: PaymentId) -> anyhow::Result<()> {
    let config = PollConfig::from_env()?;

    let query: Arc<dyn PaymentQuery> = match HttpPaymentClient::from_env() {
        Ok(client) => {
            tracing::info!("✓ Billing API at {}", client.config().base_url);
            Arc::new(client)
        }
        Err(e) => {
            tracing::warn!("⚠ Billing API not configured ({e}) - using demo service");
            demo_service(&payment_id, &config)
        }
    };

    let mut poller = PaymentPoller::new(query, Arc::new(TracingNotifier), config);
    poller.start_polling(payment_id.clone(), |_| {});

    let outcome = tokio::select! {
        outcome = poller.wait() => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received ctrl+c, stopping");
            None
        }
    };
    poller.stop_polling();

    match outcome {
        Some(PollOutcome::Confirmed(payment)) => {
            println!("{}", serde_json::to_string_pretty(&payment)?);
            Ok(())
        }
        Some(PollOutcome::Failed(payment)) => {
            bail!("payment {} ended as {}", payment.id, payment.status)
        }
        Some(PollOutcome::TimedOut { attempts, .. }) => {
            bail!("payment {payment_id} still pending after {attempts} checks")
        }
        None => bail!("polling of {payment_id} was interrupted"),
    }
}

/// Pending PIX charge that the fake provider settles after a few checks
fn demo_service(payment_id: &PaymentId, config: &PollConfig) -> Arc<dyn PaymentQuery> {
    let service = Arc::new(MemoryPaymentService::new());
    service.insert(Payment::pending(payment_id.clone(), PaymentMethod::Pix, Decimal::new(2990, 2)));

    let settle = Arc::clone(&service);
    let id = payment_id.clone();
    let delay = config.interval * 2 + config.interval / 2;
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(e) = settle.set_status(&id, PaymentStatus::Confirmed) {
            tracing::error!(error = %e, "demo settlement failed");
        }
    });

    service
}

fn features(plan: Option<String>) {
    let subscription = match plan.or_else(|| std::env::var("FINANCE_PLAN").ok()) {
        Some(plan) => SubscriptionState::with_plan(plan),
        None => SubscriptionState::new(),
    };
    let resolver = PermissionResolver::standard(Arc::new(subscription));

    println!("Plan: {}", resolver.current_tier().display_name());
    println!();
    println!("Available:");
    for feature in resolver.available_features() {
        println!("  ✓ {feature}");
    }

    let locked = resolver.locked_features();
    if !locked.is_empty() {
        println!();
        println!("Locked:");
        for feature in locked {
            let check = resolver.check_upgrade_required(feature);
            let prompt = resolver.feature_block_message(feature);
            let required = check.required_plan.map_or("?", |p| p.display_name());
            println!("  ✗ {feature} [{required}] - {}", prompt.title);
        }
    }
}
