//! User-Facing Notifications
//!
//! Mutation outcomes surface as transient notices (the UI shell renders
//! them as toasts). None of them are fatal to the session.

/// Sink for user-facing notices
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn info(&self, message: &str);
}

/// Default sink routing notices to the log facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log::info!(target: "dayplan::notify", "{}", message);
    }

    fn error(&self, message: &str) {
        log::warn!(target: "dayplan::notify", "{}", message);
    }

    fn info(&self, message: &str) {
        log::info!(target: "dayplan::notify", "{}", message);
    }
}
