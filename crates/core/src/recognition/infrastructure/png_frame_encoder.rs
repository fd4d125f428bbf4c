use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("cannot encode an empty frame")]
    EmptyFrame,
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u8),
    #[error("frame data does not match {width}x{height}x{channels}")]
    SizeMismatch { width: u32, height: u32, channels: u8 },
    #[error("png encoding failed: {0}")]
    Png(#[from] image::ImageError),
}

/// Encodes a frame as PNG bytes for upload to the recognition service.
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>, EncodeError> {
    if frame.is_empty() {
        return Err(EncodeError::EmptyFrame);
    }

    let (w, h, data) = (frame.width(), frame.height(), frame.data().to_vec());
    let mismatch = || EncodeError::SizeMismatch {
        width: w,
        height: h,
        channels: frame.channels(),
    };
    let img = match frame.channels() {
        1 => DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, data).ok_or_else(mismatch)?),
        3 => DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, data).ok_or_else(mismatch)?),
        4 => DynamicImage::ImageRgba8(RgbaImage::from_raw(w, h, data).ok_or_else(mismatch)?),
        other => return Err(EncodeError::UnsupportedChannels(other)),
    };

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
