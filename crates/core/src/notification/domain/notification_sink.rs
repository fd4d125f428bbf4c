/// Outbound channel for presence announcements (e.g. a chat webhook).
///
/// Delivery is best-effort: callers log a failure and move on.
pub trait NotificationSink: Send {
    fn post(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
