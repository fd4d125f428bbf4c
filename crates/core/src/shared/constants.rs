use std::time::Duration;

/// Label shown and stored whenever no identity is currently resolved.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Suffix appended to a resolved name to form the presence announcement.
pub const PRESENCE_SUFFIX: &str = "is at the office";

/// Inactivity window after which the current identity decays to Unknown.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(9);

pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.7;
pub const DEFAULT_COLLECTION_ID: &str = "gopaloalto";
pub const DEFAULT_RECOGNITION_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_KEY_POLL: Duration = Duration::from_millis(10);
pub const DEFAULT_WINDOW_TITLE: &str = "Face Detect";
pub const DEFAULT_NOTIFICATION_QUEUE: usize = 16;

/// One pending frame at most; anything offered while the slot is taken is dropped.
pub const FRAME_HANDOFF_CAPACITY: usize = 1;
pub const LABEL_CHANNEL_CAPACITY: usize = 1;

pub const WEBHOOK_URL_ENV: &str = "SLACK_JAYWAY_URL";
pub const RECOGNITION_URL_ENV: &str = "FACEWATCH_RECOGNITION_URL";
