use std::time::Instant;

use crate::pipeline::frame_handoff::HandoffOutcome;

/// Frame counters kept by the watch loop and reported when it exits.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    pub frames_read: usize,
    pub empty_frames: usize,
    pub frames_with_faces: usize,
    pub handoffs_accepted: usize,
    pub handoffs_dropped: usize,
    start_time: Instant,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self {
            frames_read: 0,
            empty_frames: 0,
            frames_with_faces: 0,
            handoffs_accepted: 0,
            handoffs_dropped: 0,
            start_time: Instant::now(),
        }
    }

    pub fn record_handoff(&mut self, outcome: HandoffOutcome) {
        match outcome {
            HandoffOutcome::Accepted => self.handoffs_accepted += 1,
            HandoffOutcome::Dropped | HandoffOutcome::Closed => self.handoffs_dropped += 1,
        }
    }

    /// One-line report, or `None` before any frame was read.
    pub fn summary_string(&self) -> Option<String> {
        if self.frames_read == 0 {
            return None;
        }
        let secs = self.start_time.elapsed().as_secs_f64();
        let fps = if secs > 0.0 {
            self.frames_read as f64 / secs
        } else {
            0.0
        };
        Some(format!(
            "Watch summary ({} frames, {secs:.1}s, {fps:.1} fps): {} empty, {} with faces, {} sent for recognition, {} dropped while busy",
            self.frames_read,
            self.empty_frames,
            self.frames_with_faces,
            self.handoffs_accepted,
            self.handoffs_dropped,
        ))
    }

    pub fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("{text}");
        }
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}
