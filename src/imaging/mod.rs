//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Crop** | centred fixed-aspect box + `resize_to_fill` (Lanczos3) |
//! | **Sheet rasterisation** | tile the photo onto a background canvas |
//! | **Scale + re-encode** | `resize_exact` (Triangle) + JPEG encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`CropTool`] and [`Rasterizer`] traits + [`RustBackend`]
//! - **Operations**: High-level functions combining a backend with encoding

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{CropTool, Dimensions, ImagingError, Rasterizer};
pub use calculations::{
    CropRect, calculate_crop_rect, calculate_scaled_dimensions, height_for_width, mm_to_px,
    px_per_mm,
};
pub use operations::{EncodedImage, render_sheet_jpeg, scale_and_encode};
pub use params::{AspectRatio, CropRequest, Quality, RenderOptions, parse_hex_color};
pub use rust_backend::{
    RustBackend, decode_image, encode_jpeg, is_supported_image, supported_input_extensions,
};
