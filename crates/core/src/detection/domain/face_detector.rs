use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Local face-region detector run on every captured frame.
///
/// Returns zero or more boxes; an empty list is a normal outcome, not an
/// error. Implementations may keep per-frame scratch buffers, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
