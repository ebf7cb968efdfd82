/// Receiver for user-facing feedback about collection operations.
///
/// Calls are fire-and-forget; implementations must not fail.
pub trait NotificationSink: Send + Sync {
    fn notify_success(&self, message: &str);

    fn notify_failure(&self, message: &str);
}

/// Sink that writes notifications to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify_success(&self, message: &str) {
        tracing::info!(target: "reelbox::notify", "{message}");
    }

    fn notify_failure(&self, message: &str) {
        tracing::warn!(target: "reelbox::notify", "{message}");
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify_success(&self, _message: &str) {}

    fn notify_failure(&self, _message: &str) {}
}

/// A notification captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Failure(String),
}

/// In-memory sink for testing.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: std::sync::Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    pub fn events(&self) -> Vec<Notification> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: Notification) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl NotificationSink for MemorySink {
    fn notify_success(&self, message: &str) {
        self.push(Notification::Success(message.to_string()));
    }

    fn notify_failure(&self, message: &str) {
        self.push(Notification::Failure(message.to_string()));
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<T> {
    fn notify_success(&self, message: &str) {
        (**self).notify_success(message);
    }

    fn notify_failure(&self, message: &str) {
        (**self).notify_failure(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = Arc::new(MemorySink::new());
        let shared: Box<dyn NotificationSink> = Box::new(sink.clone());
        shared.notify_success("one");
        shared.notify_failure("two");
        assert_eq!(
            sink.events(),
            vec![
                Notification::Success("one".into()),
                Notification::Failure("two".into()),
            ]
        );
    }
}
