//! Payment Status Poller
//!
//! After a payment is created, the UI waits for the provider to settle it.
//! `PaymentPoller` owns at most one poll session at a time: a background task
//! that checks the payment status on a fixed interval until it settles, fails,
//! or the attempt budget runs out.
//!
//! ```text
//!  start_polling ──▶ tick ──▶ get_status ──┬─ CONFIRMED/RECEIVED ──▶ Confirmed
//!                    ▲                     ├─ CANCELLED/OVERDUE ───▶ Failed
//!                    │                     ├─ attempts exhausted ──▶ TimedOut
//!                    └──── PENDING / error ┘
//! ```
//!
//! Ticks are serialized: the next check is only scheduled after the previous
//! fetch completed. The terminal callback runs at most once per session and
//! never after `stop_polling`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use finance_core::{Notifier, Payment, PaymentError, PaymentId, PaymentQuery, PaymentStatus, Result};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Poller configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between status checks
    pub interval: Duration,

    /// Checks before giving up. Effective timeout is `interval * max_attempts`.
    pub max_attempts: u32,

    /// Stop as soon as the payment is cancelled or overdue.
    ///
    /// `false` keeps polling through those statuses until the attempt budget
    /// runs out, matching the legacy web client.
    pub stop_on_failure: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(3000),
            max_attempts: 100,
            stop_on_failure: true,
        }
    }
}

impl PollConfig {
    /// Read overrides from `FINANCE_POLL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults for missing keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("FINANCE_POLL_INTERVAL_MS") {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                PaymentError::Config(format!("FINANCE_POLL_INTERVAL_MS is not a number: {raw}"))
            })?;
            if millis == 0 {
                return Err(PaymentError::Config("FINANCE_POLL_INTERVAL_MS must be positive".into()));
            }
            config.interval = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup("FINANCE_POLL_MAX_ATTEMPTS") {
            config.max_attempts = raw.trim().parse().map_err(|_| {
                PaymentError::Config(format!("FINANCE_POLL_MAX_ATTEMPTS is not a number: {raw}"))
            })?;
        }

        if let Some(raw) = lookup("FINANCE_POLL_STOP_ON_FAILURE") {
            config.stop_on_failure = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(PaymentError::Config(format!(
                        "FINANCE_POLL_STOP_ON_FAILURE is not a boolean: {raw}"
                    )));
                }
            };
        }

        Ok(config)
    }

    /// Upper bound on how long a session can run
    pub fn timeout(&self) -> Duration {
        self.interval * self.max_attempts.max(1)
    }
}

/// How a poll session ended
#[derive(Clone, Debug, PartialEq)]
pub enum PollOutcome {
    /// Payment reached `CONFIRMED` or `RECEIVED`
    Confirmed(Payment),

    /// Payment reached `CANCELLED` or `OVERDUE`
    Failed(Payment),

    /// Attempt budget exhausted without a terminal status
    TimedOut { payment_id: PaymentId, attempts: u32 },
}

impl PollOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    pub const fn payment(&self) -> Option<&Payment> {
        match self {
            Self::Confirmed(payment) | Self::Failed(payment) => Some(payment),
            Self::TimedOut { .. } => None,
        }
    }
}

type TerminalCallback = Box<dyn FnOnce(PollOutcome) + Send>;

/// Shortest accepted tick period; tokio rejects a zero period
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// State shared between the poller handle and its session task
#[derive(Debug)]
struct SessionState {
    active: AtomicBool,
    attempts: AtomicU32,
}

impl SessionState {
    const fn new() -> Self {
        Self {
            active: AtomicBool::new(true),
            attempts: AtomicU32::new(0),
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn next_attempt(&self) -> u32 {
        self.attempts.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Flip active → inactive. Only one caller ever wins.
    fn finish(&self) -> bool {
        self.active
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

struct PollSession {
    payment_id: PaymentId,
    state: Arc<SessionState>,
    task: JoinHandle<Option<PollOutcome>>,
}

/// Owns the poll session for the "current payment" of a UI flow
pub struct PaymentPoller {
    query: Arc<dyn PaymentQuery>,
    notifier: Arc<dyn Notifier>,
    config: PollConfig,
    session: Option<PollSession>,
}

impl PaymentPoller {
    /// Create a poller
    pub fn new(query: Arc<dyn PaymentQuery>, notifier: Arc<dyn Notifier>, config: PollConfig) -> Self {
        Self {
            query,
            notifier,
            config,
            session: None,
        }
    }

    /// Create with default configuration (3 s interval, 100 attempts)
    pub fn with_defaults(query: Arc<dyn PaymentQuery>, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(query, notifier, PollConfig::default())
    }

    pub const fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Start polling `payment_id` with the configured interval and budget.
    ///
    /// Any running session is cancelled first. `on_terminal` is called once
    /// when the session ends on its own; it is never called for a session
    /// ended by `stop_polling`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_polling<F>(&mut self, payment_id: impl Into<PaymentId>, on_terminal: F)
    where
        F: FnOnce(PollOutcome) + Send + 'static,
    {
        let interval = self.config.interval;
        let max_attempts = self.config.max_attempts;
        self.start_polling_with(payment_id, interval, max_attempts, on_terminal);
    }

    /// Start polling with a per-session interval and attempt budget.
    ///
    /// Intervals below 1 ms are raised to 1 ms.
    pub fn start_polling_with<F>(
        &mut self,
        payment_id: impl Into<PaymentId>,
        interval: Duration,
        max_attempts: u32,
        on_terminal: F,
    ) where
        F: FnOnce(PollOutcome) + Send + 'static,
    {
        self.stop_polling();

        let payment_id = payment_id.into();
        let interval = interval.max(MIN_INTERVAL);
        let state = Arc::new(SessionState::new());
        let worker = SessionWorker {
            payment_id: payment_id.clone(),
            query: Arc::clone(&self.query),
            notifier: Arc::clone(&self.notifier),
            state: Arc::clone(&state),
            interval,
            max_attempts: max_attempts.max(1),
            stop_on_failure: self.config.stop_on_failure,
        };

        tracing::info!(
            payment_id = %payment_id,
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            max_attempts = worker.max_attempts,
            "Started payment polling"
        );

        let task = tokio::spawn(worker.run(Box::new(on_terminal)));
        self.session = Some(PollSession { payment_id, state, task });
    }

    /// Cancel the current session, if any.
    ///
    /// No further status checks are issued and the terminal callback will not
    /// run, even if a check is currently in flight.
    pub fn stop_polling(&mut self) {
        if let Some(session) = self.session.take() {
            if session.state.finish() {
                tracing::info!(
                    payment_id = %session.payment_id,
                    attempts = session.state.attempts.load(Ordering::SeqCst),
                    "Stopped payment polling"
                );
            }
            session.task.abort();
        }
    }

    /// Whether a session is still checking
    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.state.is_active())
    }

    /// Payment targeted by the active session
    pub fn current_payment(&self) -> Option<&PaymentId> {
        self.session
            .as_ref()
            .filter(|s| s.state.is_active())
            .map(|s| &s.payment_id)
    }

    /// Checks performed by the latest session
    pub fn attempts(&self) -> u32 {
        self.session
            .as_ref()
            .map_or(0, |s| s.state.attempts.load(Ordering::SeqCst))
    }

    /// Wait for the current session to end on its own.
    ///
    /// Returns `None` when there is no session. Cancel-safe: dropping the
    /// future leaves the session running.
    pub async fn wait(&mut self) -> Option<PollOutcome> {
        let session = self.session.as_mut()?;
        let result = (&mut session.task).await;
        self.session = None;
        result.ok().flatten()
    }
}

impl Drop for PaymentPoller {
    fn drop(&mut self) {
        self.stop_polling();
    }
}

/// Body of a poll session task
struct SessionWorker {
    payment_id: PaymentId,
    query: Arc<dyn PaymentQuery>,
    notifier: Arc<dyn Notifier>,
    state: Arc<SessionState>,
    interval: Duration,
    max_attempts: u32,
    stop_on_failure: bool,
}

impl SessionWorker {
    async fn run(self, on_terminal: TerminalCallback) -> Option<PollOutcome> {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let outcome = loop {
            ticker.tick().await;
            let attempt = self.state.next_attempt();

            match self.check(attempt).await {
                Some(outcome) => break outcome,
                None if attempt >= self.max_attempts => {
                    break PollOutcome::TimedOut {
                        payment_id: self.payment_id.clone(),
                        attempts: attempt,
                    };
                }
                None => {}
            }
        };

        // stop_polling may have won while the last check was in flight
        if !self.state.finish() {
            tracing::debug!(payment_id = %self.payment_id, "Discarding result of a stopped poll session");
            return None;
        }

        self.report(&outcome);
        on_terminal(outcome.clone());
        Some(outcome)
    }

    /// One status check. `None` means keep polling.
    async fn check(&self, attempt: u32) -> Option<PollOutcome> {
        match self.query.get_status(&self.payment_id).await {
            Ok(payment) => self.evaluate(payment, attempt),
            Err(e) => {
                tracing::warn!(
                    payment_id = %self.payment_id,
                    attempt,
                    error = %e,
                    "Payment status check failed"
                );
                None
            }
        }
    }

    fn evaluate(&self, payment: Payment, attempt: u32) -> Option<PollOutcome> {
        match payment.status {
            status if status.is_success() => Some(PollOutcome::Confirmed(payment)),
            status if status.is_failure() && self.stop_on_failure => Some(PollOutcome::Failed(payment)),
            status => {
                tracing::debug!(
                    payment_id = %self.payment_id,
                    attempt,
                    status = %status,
                    "Payment not settled yet"
                );
                None
            }
        }
    }

    fn report(&self, outcome: &PollOutcome) {
        match outcome {
            PollOutcome::Confirmed(payment) => {
                tracing::info!(
                    payment_id = %payment.id,
                    status = %payment.status,
                    "Payment confirmed"
                );
                self.notifier.show_success("Payment confirmed!");
            }
            PollOutcome::Failed(payment) => {
                tracing::info!(
                    payment_id = %payment.id,
                    status = %payment.status,
                    "Payment will not be completed"
                );
                let text = match payment.status {
                    PaymentStatus::Overdue => "Payment is overdue. Generate a new charge to continue.",
                    _ => "Payment was cancelled.",
                };
                self.notifier.show_error(text);
            }
            PollOutcome::TimedOut { payment_id, attempts } => {
                tracing::warn!(
                    payment_id = %payment_id,
                    attempts,
                    "Gave up waiting for payment confirmation"
                );
            }
        }
    }
}
