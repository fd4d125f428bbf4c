use std::time::Duration;

use crate::capture::domain::display_surface::DisplaySurface;
use crate::capture::domain::frame_source::FrameSource;
use crate::capture::domain::overlay::Overlay;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::frame_handoff::FrameHandoff;
use crate::pipeline::identity_store::IdentityStore;
use crate::pipeline::pipeline_error::PipelineError;
use crate::pipeline::pipeline_stats::PipelineStats;

/// Whether the watch loop should keep going after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Real-time loop: capture → detect → hand off → annotate → display.
///
/// Owns the capture device and the display surface and releases both when
/// [`WatchFacesUseCase::execute`] returns, whatever the outcome.
pub struct WatchFacesUseCase {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    display: Box<dyn DisplaySurface>,
    handoff: FrameHandoff,
    identity: IdentityStore,
    key_poll: Duration,
    stats: PipelineStats,
}

impl WatchFacesUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        display: Box<dyn DisplaySurface>,
        handoff: FrameHandoff,
        identity: IdentityStore,
        key_poll: Duration,
    ) -> Self {
        Self {
            source,
            detector,
            display,
            handoff,
            identity,
            key_poll,
            stats: PipelineStats::new(),
        }
    }

    /// Runs until the user presses a key or a fatal error occurs.
    pub fn execute(mut self) -> Result<PipelineStats, PipelineError> {
        let result = loop {
            match self.step() {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Quit) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        self.source.close();
        self.display.close();
        self.stats.summary();

        result.map(|()| self.stats)
    }

    /// One iteration of the loop.
    ///
    /// Empty frames are skipped without detection or display. Frames with at
    /// least one face are offered to the recognition worker without waiting,
    /// and every face is labelled with the identity current at draw time.
    pub fn step(&mut self) -> Result<LoopControl, PipelineError> {
        let frame = self
            .source
            .read_frame()
            .map_err(|e| PipelineError::Capture(e.to_string()))?;
        self.stats.frames_read += 1;

        if frame.is_empty() {
            self.stats.empty_frames += 1;
            return Ok(LoopControl::Continue);
        }

        let regions = self
            .detector
            .detect(&frame)
            .map_err(|e| PipelineError::Detection(e.to_string()))?;

        let overlays = if regions.is_empty() {
            Vec::new()
        } else {
            log::debug!("Found {} faces in frame {}", regions.len(), frame.index());
            self.stats.frames_with_faces += 1;
            let outcome = self.handoff.offer(&frame);
            log::trace!("Frame {} handoff: {outcome:?}", frame.index());
            self.stats.record_handoff(outcome);
            Overlay::for_regions(&regions, &self.identity.current())
        };

        self.display
            .show(&frame, &overlays)
            .map_err(|e| PipelineError::Display(e.to_string()))?;

        if let Some(key) = self.display.poll_key(self.key_poll) {
            log::info!("Key {key} pressed, stopping");
            return Ok(LoopControl::Quit);
        }
        Ok(LoopControl::Continue)
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }
}
