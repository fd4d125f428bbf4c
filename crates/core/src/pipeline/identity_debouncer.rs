use std::time::Duration;

use crossbeam_channel::{select, Receiver, Sender, TrySendError};

use crate::notification::domain::notification_event::NotificationEvent;
use crate::pipeline::identity_store::IdentityPublisher;
use crate::recognition::domain::identity_label::IdentityLabel;
use crate::shared::cancellation::CancellationToken;

/// What woke the debouncer on one turn of its loop.
#[derive(Debug, Clone, PartialEq)]
pub enum DebounceEvent {
    Label(IdentityLabel),
    /// No label arrived within the idle timeout.
    Idle,
}

/// Owns the identity cell: applies published labels and decays to Unknown.
///
/// Each turn waits for whichever comes first, a label or the idle timeout,
/// and the timeout restarts on every turn. A label that is ready when the
/// timeout would fire always wins, since the timeout only fires when
/// nothing else is ready.
pub struct IdentityDebouncer {
    publisher: IdentityPublisher,
    idle_timeout: Duration,
    notifications: Sender<NotificationEvent>,
}

impl IdentityDebouncer {
    pub fn new(
        publisher: IdentityPublisher,
        idle_timeout: Duration,
        notifications: Sender<NotificationEvent>,
    ) -> Self {
        Self {
            publisher,
            idle_timeout,
            notifications,
        }
    }

    /// Applies one event to the identity cell.
    ///
    /// Every resolved label is announced, including a repeat of the current
    /// one; Unknown and idle resets are never announced.
    pub fn handle(&self, event: DebounceEvent) {
        match event {
            DebounceEvent::Label(label) => {
                log::info!("Identity received: {label}");
                let announcement = NotificationEvent::for_label(&label);
                self.publisher.publish(label);
                if let Some(event) = announcement {
                    self.enqueue(event);
                }
            }
            DebounceEvent::Idle => {
                log::debug!("No identity for {:?}, resetting to Unknown", self.idle_timeout);
                self.publisher.publish(IdentityLabel::unknown());
            }
        }
    }

    /// Runs until cancelled or the label channel disconnects.
    pub fn run(&self, labels: Receiver<IdentityLabel>, cancel: &CancellationToken) {
        while let Some(event) = self.next_event(&labels, cancel) {
            self.handle(event);
        }
        log::debug!("Identity debouncer stopped");
    }

    /// Waits up to the idle timeout for the next label; `None` means stop.
    pub fn next_event(
        &self,
        labels: &Receiver<IdentityLabel>,
        cancel: &CancellationToken,
    ) -> Option<DebounceEvent> {
        select! {
            recv(labels) -> msg => msg.ok().map(DebounceEvent::Label),
            recv(cancel.receiver()) -> _ => None,
            default(self.idle_timeout) => Some(DebounceEvent::Idle),
        }
    }

    fn enqueue(&self, event: NotificationEvent) {
        match self.notifications.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                log::warn!("Notification queue full, dropping: {}", event.message());
            }
            Err(TrySendError::Disconnected(_)) => {
                log::warn!("Notification dispatcher is gone");
            }
        }
    }
}
