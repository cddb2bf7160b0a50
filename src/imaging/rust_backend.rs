//! Pure Rust imaging backend, no system libraries.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` |
//! | Crop | [`calculate_crop_rect`](super::calculations::calculate_crop_rect) + `DynamicImage::crop_imm` |
//! | Resample crop / sheet cells | `resize_to_fill` with `Lanczos3` |
//! | Downscale for compression | `DynamicImage::resize_exact` with `Triangle` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{CropTool, ImagingError, Rasterizer};
use super::calculations::{calculate_crop_rect, calculate_scaled_dimensions, mm_to_px, px_per_mm};
use super::params::{CropRequest, Quality, RenderOptions};
use crate::grid::GridSheet;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageFormat, Rgb, RgbImage};
use std::path::Path;
use std::sync::LazyLock;

/// Upper bound on rendered sheet size; keeps absurd custom counts from exhausting memory.
const MAX_SHEET_PIXELS: u64 = 250_000_000;

/// Extensions whose decoders are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has a decodable image extension (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
}

/// Decode an in-memory image, sniffing the format from its bytes.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ImagingError> {
    image::load_from_memory(bytes).map_err(|e| ImagingError::Decode(e.to_string()))
}

/// Encode an RGB raster as baseline JPEG.
pub fn encode_jpeg(image: &RgbImage, quality: Quality) -> Result<Vec<u8>, ImagingError> {
    let mut buf = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
        encoder
            .encode(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| ImagingError::Encode(e.to_string()))?;
    }
    Ok(buf)
}

/// Scale both axes by `factor` and flatten to RGB.
pub fn scale_image(image: &DynamicImage, factor: f64) -> RgbImage {
    let (width, height) = calculate_scaled_dimensions((image.width(), image.height()), factor);
    image
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgb8()
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CropTool for RustBackend {
    fn crop(&self, source: &DynamicImage, request: &CropRequest) -> Result<RgbImage, ImagingError> {
        if source.width() == 0 || source.height() == 0 {
            return Err(ImagingError::ProcessingFailed(
                "cannot crop an empty image".into(),
            ));
        }
        let rect = calculate_crop_rect(
            (source.width(), source.height()),
            request.aspect.ratio(),
            request.auto_crop_area,
        );
        let cropped = source.crop_imm(rect.x, rect.y, rect.width, rect.height);
        Ok(cropped
            .resize_to_fill(
                request.output_width,
                request.output_height,
                FilterType::Lanczos3,
            )
            .to_rgb8())
    }
}

impl Rasterizer for RustBackend {
    fn render(
        &self,
        sheet: &GridSheet,
        photo: &RgbImage,
        options: &RenderOptions,
    ) -> Result<RgbImage, ImagingError> {
        let ppm = px_per_mm(options.scale);
        let width = mm_to_px(sheet.width_mm, ppm).max(1);
        let height = mm_to_px(sheet.height_mm, ppm).max(1);
        if width as u64 * height as u64 > MAX_SHEET_PIXELS {
            return Err(ImagingError::ProcessingFailed(format!(
                "sheet of {width}x{height}px is too large to render"
            )));
        }

        let mut canvas = RgbImage::from_pixel(width, height, Rgb(options.background));
        if sheet.cells.is_empty() {
            return Ok(canvas);
        }

        let cell_w = mm_to_px(sheet.layout.cell_width_mm, ppm).max(1);
        let cell_h = mm_to_px(sheet.layout.cell_height_mm, ppm).max(1);
        let tile = DynamicImage::ImageRgb8(photo.clone())
            .resize_to_fill(cell_w, cell_h, FilterType::Lanczos3)
            .to_rgb8();

        for cell in &sheet.cells {
            let x = mm_to_px(cell.x_mm, ppm) as i64;
            let y = mm_to_px(cell.y_mm, ppm) as i64;
            image::imageops::replace(&mut canvas, &tile, x, y);
        }
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{A4_PRINTABLE, GridLayout, arrange};
    use crate::test_helpers::{gradient_image, jpeg_bytes, png_bytes};

    #[test]
    fn decode_png_and_jpeg() {
        let png = decode_image(&png_bytes(40, 30)).unwrap();
        assert_eq!((png.width(), png.height()), (40, 30));

        let jpeg = decode_image(&jpeg_bytes(64, 48)).unwrap();
        assert_eq!((jpeg.width(), jpeg.height()), (64, 48));
    }

    #[test]
    fn decode_garbage_is_error() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(ImagingError::Decode(_))
        ));
    }

    #[test]
    fn encode_jpeg_roundtrip_dimensions() {
        let img = gradient_image(50, 20).to_rgb8();
        let bytes = encode_jpeg(&img, Quality::new(70)).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let back = decode_image(&bytes).unwrap();
        assert_eq!((back.width(), back.height()), (50, 20));
    }

    #[test]
    fn lower_quality_is_smaller() {
        let img = gradient_image(200, 200).to_rgb8();
        let high = encode_jpeg(&img, Quality::new(95)).unwrap();
        let low = encode_jpeg(&img, Quality::new(20)).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn scale_image_to_sixty_percent() {
        let scaled = scale_image(&gradient_image(1000, 1000), 0.6);
        assert_eq!(scaled.dimensions(), (600, 600));
    }

    #[test]
    fn crop_produces_requested_size() {
        let backend = RustBackend::new();
        let out = backend
            .crop(&gradient_image(1200, 800), &CropRequest::passport())
            .unwrap();
        assert_eq!(out.dimensions(), (600, 771));
    }

    #[test]
    fn crop_empty_image_is_error() {
        let backend = RustBackend::new();
        let empty = DynamicImage::new_rgb8(0, 0);
        assert!(backend.crop(&empty, &CropRequest::passport()).is_err());
    }

    #[test]
    fn render_places_photos_on_white_sheet() {
        let backend = RustBackend::new();
        let layout = GridLayout {
            count: 2,
            cell_width_mm: 35.0,
            cell_height_mm: 45.0,
        };
        let sheet = arrange(layout, 2.0, A4_PRINTABLE);
        let photo = RgbImage::from_pixel(60, 77, Rgb([10, 20, 30]));
        let options = RenderOptions {
            scale: 1.0,
            ..RenderOptions::default()
        };

        let out = backend.render(&sheet, &photo, &options).unwrap();
        // 190x277mm at 96dpi
        assert_eq!(out.dimensions(), (718, 1047));
        // Inside the first cell
        assert_eq!(out.get_pixel(5, 5), &Rgb([10, 20, 30]));
        // Inside the second cell (starts at 37mm ≈ 140px)
        assert_eq!(out.get_pixel(150, 5), &Rgb([10, 20, 30]));
        // Gap between cells stays background
        assert_eq!(out.get_pixel(135, 5), &Rgb([255, 255, 255]));
        // Below the single row
        assert_eq!(out.get_pixel(5, 400), &Rgb([255, 255, 255]));
    }

    #[test]
    fn render_empty_sheet_is_blank_page() {
        let backend = RustBackend::new();
        let layout = GridLayout {
            count: 0,
            cell_width_mm: 35.0,
            cell_height_mm: 45.0,
        };
        let sheet = arrange(layout, 0.0, A4_PRINTABLE);
        let options = RenderOptions {
            scale: 0.5,
            background: [1, 2, 3],
        };
        let out = backend
            .render(&sheet, &RgbImage::new(1, 1), &options)
            .unwrap();
        assert!(out.pixels().all(|p| p == &Rgb([1, 2, 3])));
    }

    #[test]
    fn render_rejects_gigantic_sheet() {
        let backend = RustBackend::new();
        let layout = GridLayout {
            count: 100_000,
            cell_width_mm: 35.0,
            cell_height_mm: 45.0,
        };
        let sheet = arrange(layout, 2.0, A4_PRINTABLE);
        assert!(backend
            .render(&sheet, &RgbImage::new(1, 1), &RenderOptions::default())
            .is_err());
    }

    #[test]
    fn supported_extensions_match_case_insensitively() {
        assert!(is_supported_image(Path::new("a/photo.JPG")));
        assert!(is_supported_image(Path::new("scan.webp")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("noext")));
    }
}
