pub mod notification_event;
pub mod notification_sink;
