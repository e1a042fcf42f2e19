//! Notification Sink
//!
//! User-facing toasts. Fire-and-forget: callers never wait on or inspect
//! the result of a notification.

/// Destination for user-visible success/error messages
pub trait Notifier: Send + Sync {
    fn show_success(&self, text: &str);
    
    fn show_error(&self, text: &str);
}

/// Notifier that writes messages to the tracing subscriber.
///
/// Used by headless frontends such as the `finance-watch` binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_success(&self, text: &str) {
        tracing::info!(target: "notify", "{}", text);
    }
    
    fn show_error(&self, text: &str) {
        tracing::error!(target: "notify", "{}", text);
    }
}
