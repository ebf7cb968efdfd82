use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Emits a pushed value only once no newer value has arrived for `delay`.
///
/// Each push restarts the timer. Dropping the debouncer cancels any value
/// still waiting to fire.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Start a debouncer on the current tokio runtime. Settled values arrive
    /// on the returned receiver.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input, mut input_rx) = mpsc::unbounded_channel::<T>();
        let (output, output_rx) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                match pending.take() {
                    None => match input_rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    Some(value) => {
                        tokio::select! {
                            next = input_rx.recv() => match next {
                                Some(newer) => pending = Some(newer),
                                None => break,
                            },
                            _ = tokio::time::sleep(delay) => {
                                if output.send(value).is_err() {
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        });

        (Self { input, task }, output_rx)
    }

    /// Replace the pending value and restart the timer.
    pub fn push(&self, value: T) {
        let _ = self.input.send(value);
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
