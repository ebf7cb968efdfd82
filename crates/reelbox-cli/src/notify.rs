use console::style;
use reelbox_core::notify::NotificationSink;

/// Prints repository notifications to the terminal.
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify_success(&self, message: &str) {
        println!("{} {message}", style("✓").green());
    }

    fn notify_failure(&self, message: &str) {
        eprintln!("{} {message}", style("✗").red());
    }
}
