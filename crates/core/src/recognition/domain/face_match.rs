/// One scored candidate returned by a face search.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceMatch {
    /// Similarity reported by the service, in its own scale.
    pub score: f32,
    /// Identifier the face was indexed under, if the service returned one.
    pub external_id: Option<String>,
}

impl FaceMatch {
    pub fn new(score: f32, external_id: impl Into<String>) -> Self {
        Self {
            score,
            external_id: Some(external_id.into()),
        }
    }
}

/// A single face-search call: the encoded image and where to look it up.
#[derive(Clone, Debug)]
pub struct RecognitionRequest {
    pub image_png: Vec<u8>,
    pub collection_id: String,
    pub match_threshold: f32,
}
