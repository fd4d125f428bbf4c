use crossbeam_channel::{select, Receiver, Sender};

use crate::recognition::domain::face_match::{FaceMatch, RecognitionRequest};
use crate::recognition::domain::identity_label::IdentityLabel;
use crate::recognition::domain::identity_recognizer::{IdentityRecognizer, RecognitionFailure};
use crate::recognition::infrastructure::png_frame_encoder::encode_png;
use crate::shared::cancellation::CancellationToken;
use crate::shared::frame::Frame;

/// Resolves frames to identity labels, one remote lookup at a time.
pub struct RecognitionWorker {
    recognizer: Box<dyn IdentityRecognizer>,
    collection_id: String,
    match_threshold: f32,
}

impl RecognitionWorker {
    pub fn new(
        recognizer: Box<dyn IdentityRecognizer>,
        collection_id: impl Into<String>,
        match_threshold: f32,
    ) -> Self {
        Self {
            recognizer,
            collection_id: collection_id.into(),
            match_threshold,
        }
    }

    /// Encodes `frame`, searches the collection and derives the label.
    pub fn recognize(&self, frame: &Frame) -> Result<IdentityLabel, RecognitionFailure> {
        let request = RecognitionRequest {
            image_png: encode_png(frame)?,
            collection_id: self.collection_id.clone(),
            match_threshold: self.match_threshold,
        };
        let matches = self.recognizer.search(&request)?;
        Ok(label_from_matches(&matches))
    }

    /// Receives frames until cancelled or either channel disconnects.
    ///
    /// A failed lookup publishes nothing; the debouncer's idle timeout
    /// covers the gap.
    pub fn run(
        &self,
        frames: Receiver<Frame>,
        labels: Sender<IdentityLabel>,
        cancel: &CancellationToken,
    ) {
        loop {
            let frame = select! {
                recv(frames) -> msg => match msg {
                    Ok(frame) => frame,
                    Err(_) => break,
                },
                recv(cancel.receiver()) -> _ => break,
            };
            log::trace!("Recognizing frame {}", frame.index());

            let label = match self.recognize(&frame) {
                Ok(label) => label,
                Err(e) => {
                    log::warn!("Face recognition failed for frame {}: {e}", frame.index());
                    continue;
                }
            };

            select! {
                send(labels, label) -> sent => {
                    if sent.is_err() {
                        break;
                    }
                }
                recv(cancel.receiver()) -> _ => break,
            }
        }
        log::debug!("Recognition worker stopped");
    }
}

/// Label for the top-ranked match, or Unknown when nothing matched.
pub fn label_from_matches(matches: &[FaceMatch]) -> IdentityLabel {
    matches
        .first()
        .and_then(|m| m.external_id.as_deref())
        .map(IdentityLabel::from_external_id)
        .unwrap_or_default()
}
