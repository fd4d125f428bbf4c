pub mod frame_handoff;
pub mod identity_debouncer;
pub mod identity_store;
pub mod infrastructure;
pub mod notification_dispatcher;
pub mod pipeline_error;
pub mod pipeline_stats;
pub mod recognition_worker;
pub mod watch_faces_use_case;
