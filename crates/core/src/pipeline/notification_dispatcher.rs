use crossbeam_channel::{select, Receiver};

use crate::notification::domain::notification_event::NotificationEvent;
use crate::notification::domain::notification_sink::NotificationSink;
use crate::shared::cancellation::CancellationToken;

/// Delivery counts for one dispatcher run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Drains queued announcements into a sink off the debouncer's thread.
///
/// Failures are logged and never retried.
pub struct NotificationDispatcher {
    sink: Box<dyn NotificationSink>,
}

impl NotificationDispatcher {
    pub fn new(sink: Box<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    pub fn dispatch(&self, event: &NotificationEvent) -> bool {
        let message = event.message();
        match self.sink.post(&message) {
            Ok(()) => {
                log::debug!("Notified: {message}");
                true
            }
            Err(e) => {
                log::warn!("Failed to deliver notification {message:?}: {e}");
                false
            }
        }
    }

    /// Runs until cancelled or the event queue disconnects.
    pub fn run(
        &self,
        events: Receiver<NotificationEvent>,
        cancel: &CancellationToken,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        loop {
            let event = select! {
                recv(events) -> msg => match msg {
                    Ok(event) => event,
                    Err(_) => break,
                },
                recv(cancel.receiver()) -> _ => break,
            };
            if self.dispatch(&event) {
                report.delivered += 1;
            } else {
                report.failed += 1;
            }
        }
        log::debug!(
            "Notification dispatcher stopped ({} delivered, {} failed)",
            report.delivered,
            report.failed
        );
        report
    }
}
