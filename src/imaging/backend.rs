//! Capability traits for the two external collaborators of the tools.
//!
//! - [`CropTool`]: given a decoded image and a crop request, produce the
//!   cropped raster at the requested output size.
//! - [`Rasterizer`]: given an arranged [`GridSheet`] and the photo, produce
//!   the sheet as a single raster.
//!
//! The production implementation of both is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the recording
//! [`MockBackend`](tests::MockBackend) so pipeline logic can be checked
//! without pixel work.

use super::params::{CropRequest, RenderOptions};
use crate::grid::GridSheet;
use image::{DynamicImage, RgbImage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Interactive-crop stand-in: turns a source image into a fixed-aspect crop.
pub trait CropTool {
    fn crop(&self, source: &DynamicImage, request: &CropRequest) -> Result<RgbImage, ImagingError>;
}

/// Renders an arranged photo sheet into a raster.
pub trait Rasterizer {
    fn render(
        &self,
        sheet: &GridSheet,
        photo: &RgbImage,
        options: &RenderOptions,
    ) -> Result<RgbImage, ImagingError>;
}
