use std::path::{Path, PathBuf};

use opencv::core::{Mat, Rect, Size, Vector};
use opencv::imgproc;
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::capture::infrastructure::opencv_mat::frame_to_mat;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

const SCALE_FACTOR: f64 = 1.1;
const MIN_NEIGHBORS: i32 = 3;

#[derive(Debug, thiserror::Error)]
pub enum DetectorLoadError {
    #[error("Invalid classifier file: {0}")]
    NotFound(PathBuf),
    #[error("Error reading cascade file: {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: Option<opencv::Error>,
    },
}

/// Haar/LBP cascade face detector, loaded once from an XML model file.
pub struct CascadeFaceDetector {
    classifier: CascadeClassifier,
}

impl CascadeFaceDetector {
    pub fn load(path: &Path) -> Result<Self, DetectorLoadError> {
        if !path.is_file() {
            return Err(DetectorLoadError::NotFound(path.to_path_buf()));
        }
        let unreadable = |source| DetectorLoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        };
        let filename = path.to_string_lossy();
        let classifier = CascadeClassifier::new(&filename).map_err(|e| unreadable(Some(e)))?;
        if classifier.empty().map_err(|e| unreadable(Some(e)))? {
            return Err(unreadable(None));
        }
        log::info!("Loaded face classifier from {}", path.display());
        Ok(Self { classifier })
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Ok(Vec::new());
        }
        let raw = frame_to_mat(frame)?;
        let gray = if frame.channels() == 1 {
            raw
        } else {
            let code = if frame.channels() == 4 {
                imgproc::COLOR_RGBA2GRAY
            } else {
                imgproc::COLOR_RGB2GRAY
            };
            let mut gray = Mat::default();
            imgproc::cvt_color_def(&raw, &mut gray, code)?;
            gray
        };

        let mut faces: Vector<Rect> = Vector::new();
        self.classifier.detect_multi_scale(
            &gray,
            &mut faces,
            SCALE_FACTOR,
            MIN_NEIGHBORS,
            0,
            Size::new(0, 0),
            Size::new(0, 0),
        )?;
        log::trace!("Frame {}: {} faces", frame.index(), faces.len());

        Ok(faces
            .iter()
            .map(|r| Region::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}
