use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::shared::constants::FRAME_HANDOFF_CAPACITY;
use crate::shared::frame::Frame;

/// Result of offering a frame to the recognition worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffOutcome {
    Accepted,
    /// The slot was occupied; the frame was discarded.
    Dropped,
    /// The worker has stopped listening.
    Closed,
}

/// Producer side of the single-slot frame channel.
///
/// Offering never blocks. While the worker still has a frame pending, new
/// frames are dropped instead of queued so recognition never lags behind
/// the display by more than one frame.
pub struct FrameHandoff {
    sender: Sender<Frame>,
}

impl FrameHandoff {
    /// Creates the handoff and the receiver the recognition worker consumes.
    pub fn new() -> (Self, Receiver<Frame>) {
        let (sender, receiver) = crossbeam_channel::bounded(FRAME_HANDOFF_CAPACITY);
        (Self { sender }, receiver)
    }

    /// Offers a copy of `frame`; the caller keeps its own for display.
    pub fn offer(&self, frame: &Frame) -> HandoffOutcome {
        match self.sender.try_send(frame.clone()) {
            Ok(()) => HandoffOutcome::Accepted,
            Err(TrySendError::Full(_)) => HandoffOutcome::Dropped,
            Err(TrySendError::Disconnected(_)) => HandoffOutcome::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize) -> Frame {
        Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, 3, index)
    }

    #[test]
    fn test_first_offer_is_accepted() {
        let (handoff, rx) = FrameHandoff::new();
        assert_eq!(handoff.offer(&frame(0)), HandoffOutcome::Accepted);
        assert_eq!(rx.try_recv().unwrap().index(), 0);
    }

    #[test]
    fn test_offers_while_busy_are_dropped_not_queued() {
        let (handoff, rx) = FrameHandoff::new();

        assert_eq!(handoff.offer(&frame(0)), HandoffOutcome::Accepted);
        for i in 1..100 {
            assert_eq!(handoff.offer(&frame(i)), HandoffOutcome::Dropped);
        }

        assert_eq!(rx.len(), 1);
        assert_eq!(rx.try_recv().unwrap().index(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_slot_frees_after_worker_takes_frame() {
        let (handoff, rx) = FrameHandoff::new();
        handoff.offer(&frame(0));
        rx.try_recv().unwrap();

        assert_eq!(handoff.offer(&frame(1)), HandoffOutcome::Accepted);
        assert_eq!(rx.try_recv().unwrap().index(), 1);
    }

    #[test]
    fn test_offer_after_worker_gone_is_closed() {
        let (handoff, rx) = FrameHandoff::new();
        drop(rx);
        assert_eq!(handoff.offer(&frame(0)), HandoffOutcome::Closed);
    }

    #[test]
    fn test_offer_does_not_consume_callers_frame() {
        let (handoff, rx) = FrameHandoff::new();
        let mut original = frame(3);
        handoff.offer(&original);

        original.data_mut()[0] = 255;

        assert_eq!(rx.try_recv().unwrap().data()[0], 0);
    }
}
