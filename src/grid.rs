//! Grid layout calculator for passport photo sheets.
//!
//! Given a print unit (the physical size of one photo), a gap, a quantity
//! mode and the printable page area, decide how many copies to print and
//! where each one goes. Everything here is pure arithmetic on millimetres
//! with no pixels or images, so it is fully testable without I/O.
//!
//! ## Quantity modes
//!
//! | Mode | Count |
//! |---|---|
//! | [`QuantityMode::AutoFit`] | `floor(page.w / (w + gap)) * floor(page.h / (h + gap))` |
//! | [`QuantityMode::Fixed`] | the chosen value (4, 6, 8, 10 or 12) |
//! | [`QuantityMode::Custom`] | the parsed value, negatives become 0 |
//!
//! A unit larger than the page is not an error: AutoFit simply yields 0.
//! Every mode is capped at [`MAX_COPIES`], so a huge typed quantity or a
//! near-zero custom size still produces a small, drawable sheet.
//!
//! ## Arrangement
//!
//! [`arrange`] turns a [`GridLayout`] into concrete cell positions. Cells flow
//! left-to-right and wrap at the page width; each cell carries the gap as
//! trailing space on its right and bottom edge. Fixed and custom counts may
//! overflow one page, in which case the sheet grows downward.

use crate::parse;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("unknown size preset '{0}' (expected indian, stamp, visa, pan or custom)")]
    UnknownPreset(String),
    #[error("invalid quantity '{0}' (expected max, custom, 4, 6, 8, 10 or 12)")]
    InvalidQuantity(String),
}

/// Printable area of an A4 sheet (210×297mm) minus 10mm margins.
pub const A4_PRINTABLE: PageSize = PageSize {
    width_mm: 190.0,
    height_mm: 277.0,
};

/// Quantities offered as fixed choices.
pub const FIXED_QUANTITIES: &[u32] = &[4, 6, 8, 10, 12];

/// Upper bound on copies per sheet, whatever the mode.
///
/// The smallest preset (stamp) fits 80 on a page; 1000 leaves room for tiny
/// custom sizes and long overflowing sheets.
pub const MAX_COPIES: u32 = 1000;

/// Fallback unit dimensions when a custom size is missing or unusable.
pub const DEFAULT_UNIT: PrintUnit = PrintUnit {
    width_mm: 35.0,
    height_mm: 45.0,
};

/// Physical page area available for photos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Target physical dimensions of one printed photo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintUnit {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PrintUnit {
    /// Build a unit from free-text width/height fields.
    ///
    /// Missing, non-numeric or non-positive values fall back to
    /// [`DEFAULT_UNIT`] per axis.
    pub fn from_fields(width: &str, height: &str) -> Self {
        let positive_or = |text: &str, default: f64| match parse::leading_float(text) {
            Some(v) if v > 0.0 => v,
            _ => default,
        };
        Self {
            width_mm: positive_or(width, DEFAULT_UNIT.width_mm),
            height_mm: positive_or(height, DEFAULT_UNIT.height_mm),
        }
    }
}

/// Named print sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    /// Indian passport, 35×45mm.
    #[default]
    Indian,
    /// Stamp size, 20×25mm.
    Stamp,
    /// US visa, 2×2in (50.8×50.8mm).
    Visa,
    /// PAN card, 25×35mm.
    Pan,
    /// User-supplied width and height.
    Custom,
}

impl SizePreset {
    pub const ALL: [SizePreset; 5] = [
        SizePreset::Indian,
        SizePreset::Stamp,
        SizePreset::Visa,
        SizePreset::Pan,
        SizePreset::Custom,
    ];

    /// Fixed dimensions of the preset, `None` for [`SizePreset::Custom`].
    pub fn unit(self) -> Option<PrintUnit> {
        let (width_mm, height_mm) = match self {
            SizePreset::Indian => (35.0, 45.0),
            SizePreset::Stamp => (20.0, 25.0),
            SizePreset::Visa => (50.8, 50.8),
            SizePreset::Pan => (25.0, 35.0),
            SizePreset::Custom => return None,
        };
        Some(PrintUnit {
            width_mm,
            height_mm,
        })
    }

    /// Resolve the print unit, reading the custom fields only for `Custom`.
    pub fn resolve(self, custom_width: &str, custom_height: &str) -> PrintUnit {
        self.unit()
            .unwrap_or_else(|| PrintUnit::from_fields(custom_width, custom_height))
    }

    pub fn name(self) -> &'static str {
        match self {
            SizePreset::Indian => "indian",
            SizePreset::Stamp => "stamp",
            SizePreset::Visa => "visa",
            SizePreset::Pan => "pan",
            SizePreset::Custom => "custom",
        }
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SizePreset {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SizePreset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GridError::UnknownPreset(s.to_string()))
    }
}

/// How many copies to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityMode {
    Fixed(u32),
    AutoFit,
    /// Raw parsed value; negatives are clamped when counting.
    Custom(i64),
}

impl QuantityMode {
    /// Custom mode from the free-text quantity field. Unparseable input is 0.
    pub fn custom_from_input(input: &str) -> Self {
        QuantityMode::Custom(parse::leading_int(input).unwrap_or(0))
    }
}

/// The quantity selector as offered to the user: a fixed value, `max`, or `custom`.
///
/// `Custom` needs the separate free-text field to become a [`QuantityMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QuantityChoice {
    Fixed(u32),
    #[default]
    Max,
    Custom,
}

impl QuantityChoice {
    pub fn to_mode(self, custom_input: &str) -> QuantityMode {
        match self {
            QuantityChoice::Fixed(n) => QuantityMode::Fixed(n),
            QuantityChoice::Max => QuantityMode::AutoFit,
            QuantityChoice::Custom => QuantityMode::custom_from_input(custom_input),
        }
    }
}

impl FromStr for QuantityChoice {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" => Ok(QuantityChoice::Max),
            "custom" => Ok(QuantityChoice::Custom),
            other => other
                .parse::<u32>()
                .ok()
                .filter(|n| FIXED_QUANTITIES.contains(n))
                .map(QuantityChoice::Fixed)
                .ok_or_else(|| GridError::InvalidQuantity(s.to_string())),
        }
    }
}

impl TryFrom<String> for QuantityChoice {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuantityChoice> for String {
    fn from(choice: QuantityChoice) -> Self {
        choice.to_string()
    }
}

impl fmt::Display for QuantityChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityChoice::Fixed(n) => write!(f, "{n}"),
            QuantityChoice::Max => f.write_str("max"),
            QuantityChoice::Custom => f.write_str("custom"),
        }
    }
}

/// Resolve the gap field: non-numeric → 0, negative → 0.
pub fn gap_from_input(input: &str) -> f64 {
    clamp_gap(parse::leading_float(input).unwrap_or(0.0))
}

/// Negative gaps would let cells overlap and inflate the AutoFit count.
pub fn clamp_gap(gap_mm: f64) -> f64 {
    if gap_mm.is_finite() && gap_mm > 0.0 {
        gap_mm
    } else {
        0.0
    }
}

/// Result of a grid computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLayout {
    pub count: u32,
    pub cell_width_mm: f64,
    pub cell_height_mm: f64,
}

/// Whole cells of `span` fitting into `extent`.
fn fit(extent: f64, span: f64) -> u32 {
    if span <= 0.0 {
        return 0;
    }
    // `as` saturates, so absurdly small units cannot overflow.
    (extent / span).floor() as u32
}

fn cap_copies(count: u64) -> u32 {
    if count > MAX_COPIES as u64 {
        warn!(requested = count, cap = MAX_COPIES, "grid: copy count capped");
        MAX_COPIES
    } else {
        count as u32
    }
}

/// Columns and rows an AutoFit pass would use.
pub fn autofit_dimensions(unit: PrintUnit, gap_mm: f64, page: PageSize) -> (u32, u32) {
    let gap = clamp_gap(gap_mm);
    (
        fit(page.width_mm, unit.width_mm + gap),
        fit(page.height_mm, unit.height_mm + gap),
    )
}

/// Compute how many copies to print and at what cell size.
///
/// Pure function of its inputs: identical arguments always give identical
/// results. Negative gaps are treated as 0 and the count never exceeds
/// [`MAX_COPIES`].
pub fn compute_grid(
    unit: PrintUnit,
    gap_mm: f64,
    mode: QuantityMode,
    page: PageSize,
) -> GridLayout {
    let count = match mode {
        QuantityMode::AutoFit => {
            let (cols, rows) = autofit_dimensions(unit, gap_mm, page);
            cap_copies(cols as u64 * rows as u64)
        }
        QuantityMode::Fixed(n) => cap_copies(n as u64),
        QuantityMode::Custom(n) => cap_copies(n.max(0) as u64),
    };
    GridLayout {
        count,
        cell_width_mm: unit.width_mm,
        cell_height_mm: unit.height_mm,
    }
}

/// Position of one cell on the sheet, top-left corner in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellPlacement {
    pub x_mm: f64,
    pub y_mm: f64,
}

/// A fully arranged sheet, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSheet {
    pub layout: GridLayout,
    pub gap_mm: f64,
    pub columns: u32,
    pub rows: u32,
    pub width_mm: f64,
    pub height_mm: f64,
    pub cells: Vec<CellPlacement>,
}

/// Lay out `layout.count` cells on a sheet `page.width_mm` wide.
///
/// At least one column is used even when a cell is wider than the page, and
/// the sheet is never shorter than the page. Counts above [`MAX_COPIES`]
/// are capped before any cell is placed.
pub fn arrange(layout: GridLayout, gap_mm: f64, page: PageSize) -> GridSheet {
    let layout = GridLayout {
        count: cap_copies(layout.count as u64),
        ..layout
    };
    let gap = clamp_gap(gap_mm);
    let pitch_x = layout.cell_width_mm + gap;
    let pitch_y = layout.cell_height_mm + gap;
    let columns = fit(page.width_mm, pitch_x).max(1);
    let rows = layout.count.div_ceil(columns);

    let cells = (0..layout.count)
        .map(|i| CellPlacement {
            x_mm: (i % columns) as f64 * pitch_x,
            y_mm: (i / columns) as f64 * pitch_y,
        })
        .collect();

    let used_width = columns.min(layout.count.max(1)) as f64 * pitch_x;
    GridSheet {
        layout,
        gap_mm: gap,
        columns,
        rows,
        width_mm: page.width_mm.max(used_width),
        height_mm: page.height_mm.max(rows as f64 * pitch_y),
        cells,
    }
}
