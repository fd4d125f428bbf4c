use crate::recognition::domain::face_match::{FaceMatch, RecognitionRequest};

pub type RecognitionFailure = Box<dyn std::error::Error + Send + Sync>;

/// Remote identity lookup for a face image.
///
/// Returns matches in the service's ranking order, best first. An empty list
/// means nobody in the collection matched. Calls may block on the network;
/// any deadline is the implementation's responsibility.
pub trait IdentityRecognizer: Send {
    fn search(&self, request: &RecognitionRequest) -> Result<Vec<FaceMatch>, RecognitionFailure>;
}
