//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// CSS reference density: 96 pixels per inch, 25.4 mm per inch.
pub const CSS_PX_PER_MM: f64 = 96.0 / 25.4;

/// Rectangle inside a source image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Truncate a computed pixel extent the way a canvas dimension does, keeping it at least 1.
fn canvas_extent(value: f64) -> u32 {
    // The epsilon absorbs binary representation error (e.g. 1000 * 0.6).
    ((value + 1e-9).floor() as u32).max(1)
}

/// Height of a box of the given width and `width / height` ratio.
///
/// ```
/// # use mahatools::imaging::height_for_width;
/// // 3.5:4.5 at 600px wide → 771px (771.43 truncated)
/// assert_eq!(height_for_width(600, 3.5 / 4.5), 771);
/// ```
pub fn height_for_width(width: u32, ratio: f64) -> u32 {
    canvas_extent(width as f64 / ratio)
}

/// Scale both axes by the same factor, truncating like a canvas.
///
/// ```
/// # use mahatools::imaging::calculate_scaled_dimensions;
/// assert_eq!(calculate_scaled_dimensions((1000, 1000), 0.6), (600, 600));
/// assert_eq!(calculate_scaled_dimensions((1001, 3), 0.6), (600, 1));
/// ```
pub fn calculate_scaled_dimensions(source: (u32, u32), factor: f64) -> (u32, u32) {
    let (w, h) = source;
    (
        canvas_extent(w as f64 * factor),
        canvas_extent(h as f64 * factor),
    )
}

/// Initial crop box: the largest centred box of `ratio` that fits the source,
/// shrunk to `area` of its size and re-centred.
///
/// # Arguments
/// * `source` - Source image dimensions (width, height)
/// * `ratio` - Crop box `width / height`
/// * `area` - Coverage of the largest box, clamped to `(0, 1]`
pub fn calculate_crop_rect(source: (u32, u32), ratio: f64, area: f64) -> CropRect {
    let (src_w, src_h) = source;
    let area = if area > 0.0 { area.min(1.0) } else { 1.0 };

    let (max_w, max_h) = if src_w as f64 / src_h as f64 > ratio {
        // Source is wider: full height, width follows the ratio
        (src_h as f64 * ratio, src_h as f64)
    } else {
        // Source is taller: full width, height follows the ratio
        (src_w as f64, src_w as f64 / ratio)
    };

    let width = ((max_w * area).round() as u32).clamp(1, src_w.max(1));
    let height = ((max_h * area).round() as u32).clamp(1, src_h.max(1));

    CropRect {
        x: (src_w - width) / 2,
        y: (src_h - height) / 2,
        width,
        height,
    }
}

/// Pixels per millimetre at the given render scale.
pub fn px_per_mm(scale: f64) -> f64 {
    CSS_PX_PER_MM * scale
}

/// Convert millimetres to whole pixels.
pub fn mm_to_px(mm: f64, px_per_mm: f64) -> u32 {
    (mm * px_per_mm).round().max(0.0) as u32
}
