use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::capture::domain::frame_source::FrameSource;
use crate::capture::infrastructure::opencv_mat::mat_to_frame;
use crate::shared::frame::Frame;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Error opening video capture device: {index}")]
    Open {
        index: i32,
        #[source]
        source: Option<opencv::Error>,
    },
    #[error("Device closed: {index}")]
    Closed { index: i32 },
    #[error("cannot read device {index}")]
    EndOfStream { index: i32 },
    #[error("Failed to read frame from device {index}: {source}")]
    Read { index: i32, source: opencv::Error },
}

/// A webcam opened through OpenCV's video I/O, delivering RGB frames.
pub struct OpencvCamera {
    index: i32,
    capture: VideoCapture,
    next_index: usize,
    closed: bool,
}

impl OpencvCamera {
    pub fn open(index: i32) -> Result<Self, CaptureError> {
        let capture = VideoCapture::new(index, videoio::CAP_ANY).map_err(|e| CaptureError::Open {
            index,
            source: Some(e),
        })?;
        let opened = capture.is_opened().map_err(|e| CaptureError::Open {
            index,
            source: Some(e),
        })?;
        if !opened {
            return Err(CaptureError::Open {
                index,
                source: None,
            });
        }
        log::debug!("Opened capture device {index}");
        Ok(Self {
            index,
            capture,
            next_index: 0,
            closed: false,
        })
    }

    /// `None` when the device reports no more frames; an empty matrix
    /// from a live device is passed through for the caller to skip.
    fn read_mat(&mut self) -> opencv::Result<Option<Mat>> {
        let mut bgr = Mat::default();
        if !self.capture.read(&mut bgr)? {
            return Ok(None);
        }
        if bgr.empty() {
            return Ok(Some(bgr));
        }
        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB)?;
        Ok(Some(rgb))
    }
}

impl FrameSource for OpencvCamera {
    fn read_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        if self.closed {
            return Err(CaptureError::Closed { index: self.index }.into());
        }
        let index = self.next_index;
        self.next_index += 1;

        let device = self.index;
        let read_error = |source| CaptureError::Read {
            index: device,
            source,
        };
        match self.read_mat().map_err(read_error)? {
            Some(mat) => Ok(mat_to_frame(&mat, index).map_err(read_error)?),
            None => Err(CaptureError::EndOfStream { index: device }.into()),
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.capture.release() {
            log::warn!("Failed to release capture device {}: {e}", self.index);
        }
    }
}

impl Drop for OpencvCamera {
    fn drop(&mut self) {
        self.close();
    }
}
