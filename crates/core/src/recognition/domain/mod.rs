pub mod face_match;
pub mod identity_label;
pub mod identity_recognizer;
