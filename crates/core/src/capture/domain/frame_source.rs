use crate::shared::frame::Frame;

/// A live capture device.
///
/// `read_frame` blocks until the device delivers the next frame. An `Err`
/// means the device is gone; callers treat it as fatal. A device that
/// produced no image returns an empty frame instead (see [`Frame::is_empty`]).
pub trait FrameSource: Send {
    fn read_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;

    /// Releases the device. Must be safe to call more than once.
    fn close(&mut self);
}
