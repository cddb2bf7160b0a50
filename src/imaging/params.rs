//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the tools (which decide what to crop, render or encode) and the
//! [`backend`](super::backend) traits (which do the pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 90). Clamped on construction.
//! - [`AspectRatio`]: width:height of a crop box.
//! - [`CropRequest`]: aspect, output size and initial crop-box coverage.
//! - [`RenderOptions`]: rasterisation scale and background colour for photo sheets.

use super::calculations::height_for_width;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    /// From a `0.0..=1.0` fraction, as canvas encoders take it.
    pub fn from_fraction(fraction: f64) -> Self {
        Self::new((fraction * 100.0).round() as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Width:height ratio of a crop box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl AspectRatio {
    /// Indian passport proportions, 3.5:4.5.
    pub const PASSPORT: AspectRatio = AspectRatio {
        width: 3.5,
        height: 4.5,
    };

    pub fn ratio(self) -> f64 {
        self.width / self.height
    }
}

/// What the crop step should produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRequest {
    pub aspect: AspectRatio,
    pub output_width: u32,
    pub output_height: u32,
    /// Share (0–1] of the largest centred aspect box the crop covers.
    pub auto_crop_area: f64,
}

impl CropRequest {
    /// Canonical passport crop: 3.5:4.5 at 600px wide, 90% auto-crop area.
    pub fn passport() -> Self {
        let aspect = AspectRatio::PASSPORT;
        Self {
            aspect,
            output_width: 600,
            output_height: height_for_width(600, aspect.ratio()),
            auto_crop_area: 0.9,
        }
    }
}

/// How a photo sheet is rasterised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Multiplier over CSS pixel density (96 px/inch).
    pub scale: f64,
    pub background: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: [255, 255, 255],
        }
    }
}

/// Parse `#rrggbb` or `#rgb` into an RGB triple.
pub fn parse_hex_color(input: &str) -> Option<[u8; 3]> {
    let hex = input.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some([channel(0)?, channel(2)?, channel(4)?])
        }
        3 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some([channel(0)?, channel(1)?, channel(2)?])
        }
        _ => None,
    }
}
