//! High-level image operations.
//!
//! These functions combine calculations with backend execution: they take
//! already-decided parameters, run the pixel work, and hand back encoded bytes.

use super::backend::{ImagingError, Rasterizer};
use super::params::{Quality, RenderOptions};
use super::rust_backend::{encode_jpeg, scale_image};
use crate::grid::GridSheet;
use image::{DynamicImage, RgbImage};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// An encoded JPEG together with its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Rasterise a photo sheet and encode it as JPEG.
pub fn render_sheet_jpeg(
    rasterizer: &impl Rasterizer,
    sheet: &GridSheet,
    photo: &RgbImage,
    options: &RenderOptions,
    quality: Quality,
) -> Result<EncodedImage> {
    let raster = rasterizer.render(sheet, photo, options)?;
    Ok(EncodedImage {
        width: raster.width(),
        height: raster.height(),
        bytes: encode_jpeg(&raster, quality)?,
    })
}

/// Downscale by `factor` on both axes and re-encode as JPEG.
pub fn scale_and_encode(
    image: &DynamicImage,
    factor: f64,
    quality: Quality,
) -> Result<EncodedImage> {
    let scaled = scale_image(image, factor);
    Ok(EncodedImage {
        width: scaled.width(),
        height: scaled.height(),
        bytes: encode_jpeg(&scaled, quality)?,
    })
}
