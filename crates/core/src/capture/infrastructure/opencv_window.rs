use std::time::Duration;

use opencv::core::{Mat, Point, Rect, Scalar};
use opencv::highgui;
use opencv::imgproc;
use opencv::prelude::*;

use crate::capture::domain::display_surface::DisplaySurface;
use crate::capture::domain::overlay::Overlay;
use crate::capture::infrastructure::opencv_mat::frame_to_mat;
use crate::shared::frame::Frame;

const BOX_THICKNESS: i32 = 3;
const LABEL_FONT: i32 = imgproc::FONT_HERSHEY_PLAIN;
const LABEL_SCALE: f64 = 1.2;
const LABEL_THICKNESS: i32 = 2;

/// Blue in OpenCV's BGR channel order.
fn overlay_color() -> Scalar {
    Scalar::new(255.0, 0.0, 0.0, 0.0)
}

#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("Failed to open window {title:?}: {source}")]
    Open {
        title: String,
        source: opencv::Error,
    },
    #[error("Failed to render frame {index}: {source}")]
    Render { index: usize, source: opencv::Error },
}

/// A native HighGUI window showing annotated frames.
pub struct OpencvWindow {
    title: String,
    closed: bool,
}

impl OpencvWindow {
    pub fn open(title: &str) -> Result<Self, DisplayError> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE).map_err(|source| {
            DisplayError::Open {
                title: title.to_string(),
                source,
            }
        })?;
        Ok(Self {
            title: title.to_string(),
            closed: false,
        })
    }

    fn render(&self, frame: &Frame, overlays: &[Overlay]) -> opencv::Result<()> {
        let raw = frame_to_mat(frame)?;
        let code = match frame.channels() {
            1 => imgproc::COLOR_GRAY2BGR,
            4 => imgproc::COLOR_RGBA2BGR,
            _ => imgproc::COLOR_RGB2BGR,
        };
        let mut canvas = Mat::default();
        imgproc::cvt_color_def(&raw, &mut canvas, code)?;

        for overlay in overlays {
            draw_overlay(&mut canvas, overlay)?;
        }
        highgui::imshow(&self.title, &canvas)
    }
}

fn draw_overlay(canvas: &mut Mat, overlay: &Overlay) -> opencv::Result<()> {
    let region = overlay.region;
    imgproc::rectangle(
        canvas,
        Rect::new(region.x, region.y, region.width, region.height),
        overlay_color(),
        BOX_THICKNESS,
        imgproc::LINE_8,
        0,
    )?;

    let text = overlay.label.as_str();
    let mut baseline = 0;
    let size = imgproc::get_text_size(text, LABEL_FONT, LABEL_SCALE, LABEL_THICKNESS, &mut baseline)?;
    let (x, y) = overlay.label_origin(size.width);
    imgproc::put_text(
        canvas,
        text,
        Point::new(x, y),
        LABEL_FONT,
        LABEL_SCALE,
        overlay_color(),
        LABEL_THICKNESS,
        imgproc::LINE_8,
        false,
    )
}

impl DisplaySurface for OpencvWindow {
    fn show(
        &mut self,
        frame: &Frame,
        overlays: &[Overlay],
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.render(frame, overlays)
            .map_err(|source| DisplayError::Render {
                index: frame.index(),
                source,
            })?;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<i32> {
        // wait_key(0) blocks forever, so never pass a zero delay.
        let delay = timeout.as_millis().clamp(1, i32::MAX as u128) as i32;
        match highgui::wait_key(delay) {
            Ok(key) if key >= 0 => Some(key),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Key poll failed: {e}");
                None
            }
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = highgui::destroy_window(&self.title) {
            log::warn!("Failed to close window {:?}: {e}", self.title);
        }
    }
}

impl Drop for OpencvWindow {
    fn drop(&mut self) {
        self.close();
    }
}
