use opencv::core::{Mat, Scalar, CV_8UC1, CV_8UC3, CV_8UC4};
use opencv::prelude::*;

use crate::shared::frame::Frame;

/// Copies `frame` into a freshly allocated matrix, keeping its channel order.
pub fn frame_to_mat(frame: &Frame) -> opencv::Result<Mat> {
    let typ = match frame.channels() {
        1 => CV_8UC1,
        3 => CV_8UC3,
        4 => CV_8UC4,
        n => {
            return Err(opencv::Error::new(
                opencv::core::StsBadArg,
                format!("unsupported channel count: {n}"),
            ))
        }
    };
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        typ,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(frame.data());
    Ok(mat)
}

/// Copies a continuous 8-bit matrix into a frame. An empty matrix yields
/// an empty frame.
pub fn mat_to_frame(mat: &Mat, index: usize) -> opencv::Result<Frame> {
    if mat.empty() {
        return Ok(Frame::empty(index));
    }
    Ok(Frame::new(
        mat.data_bytes()?.to_vec(),
        mat.cols() as u32,
        mat.rows() as u32,
        mat.channels() as u8,
        index,
    ))
}
