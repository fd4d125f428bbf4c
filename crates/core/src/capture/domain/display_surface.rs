use std::time::Duration;

use crate::capture::domain::overlay::Overlay;
use crate::shared::frame::Frame;

/// An on-screen surface that renders annotated frames and reports key presses.
pub trait DisplaySurface {
    /// Draws `frame` with a rectangle and label for every overlay.
    fn show(
        &mut self,
        frame: &Frame,
        overlays: &[Overlay],
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Waits up to `timeout` for a key press; `None` when no key was pressed.
    fn poll_key(&mut self, timeout: Duration) -> Option<i32>;

    fn close(&mut self);
}
