//! CLI output formatting for every tool.
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Diagnostics go through
//! `tracing` to stderr; only these user-facing lines go to stdout.
//!
//! # Output Format
//!
//! ## Passport
//!
//! ```text
//! Sheet indian
//!     Unit: 35 x 45 mm
//!     Gap: 2 mm
//!     Copies: 25 (5 columns x 5 rows)
//!     Page: 190 x 277 mm
//! Saved MahaTools-Passport.jpg (1436x2094 px, 412.50 KB)
//! ```
//!
//! ## Compress
//!
//! ```text
//! 001 dawn.jpg
//!     Output: dawn-compressed.jpg
//!     Size: 600x600
//!     Original: 512.00 KB
//!     Compressed: 88.31 KB
//! Compressed 3 images, 1 failed (1.20 MB → 240.12 KB)
//! ```
//!
//! ## Invoice
//!
//! ```text
//! Bill To: Asha Traders
//! Date: 18/10/2026
//! 001 Pen  2 x ₹10.00 = ₹20.00
//! Grand Total: ₹20.00
//! ```

use crate::compress::{BatchSummary, CompressEvent, format_kb};
use crate::grid::{GridSheet, MAX_COPIES, SizePreset};
use crate::imaging::EncodedImage;
use crate::invoice::{self, Invoice};
use crate::resume::{ResumeField, ResumeView};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Millimetres without trailing zeros: `35`, `50.8`.
fn format_mm(value: f64) -> String {
    format!("{}", (value * 100.0).round() / 100.0)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Sizes below 1 MB in KB, above in MB.
fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format_kb(bytes)
    }
}

// ============================================================================
// Passport
// ============================================================================

/// Describe a computed sheet.
pub fn format_grid_summary(preset: SizePreset, sheet: &GridSheet) -> Vec<String> {
    let layout = &sheet.layout;
    let mut lines = vec![
        format!("Sheet {}", preset),
        format!(
            "{}Unit: {} x {} mm",
            indent(1),
            format_mm(layout.cell_width_mm),
            format_mm(layout.cell_height_mm)
        ),
        format!("{}Gap: {} mm", indent(1), format_mm(sheet.gap_mm)),
        format!(
            "{}Copies: {} ({} columns x {} rows)",
            indent(1),
            layout.count,
            sheet.columns,
            sheet.rows
        ),
        format!(
            "{}Page: {} x {} mm",
            indent(1),
            format_mm(sheet.width_mm),
            format_mm(sheet.height_mm)
        ),
    ];
    if layout.count >= MAX_COPIES {
        lines.push(format!("{}Capped at {} copies", indent(1), MAX_COPIES));
    }
    lines
}

pub fn print_grid_summary(preset: SizePreset, sheet: &GridSheet) {
    for line in format_grid_summary(preset, sheet) {
        println!("{}", line);
    }
}

/// One line for a written image file.
pub fn format_saved_image(path: &Path, image: &EncodedImage) -> String {
    format!(
        "Saved {} ({}x{} px, {})",
        path.display(),
        image.width,
        image.height,
        format_kb(image.bytes.len() as u64)
    )
}

// ============================================================================
// Compress
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_compress_event(event: &CompressEvent) -> Vec<String> {
    match event {
        CompressEvent::Done {
            index,
            source,
            output,
            original_bytes,
            compressed_bytes,
            width,
            height,
        } => vec![
            format!("{} {}", format_index(*index), file_name(source)),
            format!("{}Output: {}", indent(1), output.display()),
            format!("{}Size: {}x{}", indent(1), width, height),
            format!("{}Original: {}", indent(1), format_kb(*original_bytes)),
            format!("{}Compressed: {}", indent(1), format_kb(*compressed_bytes)),
        ],
        CompressEvent::Failed {
            index,
            source,
            error,
        } => vec![
            format!("{} {}", format_index(*index), file_name(source)),
            format!("{}Failed: {}", indent(1), error),
        ],
    }
}

pub fn format_batch_summary(summary: &BatchSummary) -> String {
    let noun = if summary.succeeded == 1 {
        "image"
    } else {
        "images"
    };
    let failed = if summary.failed > 0 {
        format!(", {} failed", summary.failed)
    } else {
        String::new()
    };
    format!(
        "Compressed {} {}{} ({} \u{2192} {})",
        summary.succeeded,
        noun,
        failed,
        format_size(summary.original_bytes),
        format_size(summary.compressed_bytes)
    )
}

pub fn print_batch_summary(summary: &BatchSummary) {
    println!("{}", format_batch_summary(summary));
}

// ============================================================================
// Invoice
// ============================================================================

/// The invoice as plain text: header, one line per item, grand total.
pub fn format_invoice(invoice: &Invoice, currency: &str, date_format: &str) -> Vec<String> {
    let mut lines = vec![
        format!("Bill To: {}", invoice.client_display()),
        format!(
            "Date: {}",
            invoice::format_date(invoice.date(), date_format)
        ),
    ];
    for (i, item) in invoice.items().iter().enumerate() {
        lines.push(format!(
            "{} {}  {} x {} = {}",
            format_index(i + 1),
            item.description,
            invoice::format_quantity(item.quantity),
            invoice::format_money(currency, item.unit_price),
            invoice::format_money(currency, item.total())
        ));
    }
    lines.push(format!(
        "Grand Total: {}",
        invoice::format_money(currency, invoice.total())
    ));
    lines
}

pub fn print_invoice(invoice: &Invoice, currency: &str, date_format: &str) {
    for line in format_invoice(invoice, currency, date_format) {
        println!("{}", line);
    }
}

// ============================================================================
// Resume
// ============================================================================

/// The preview as labelled text, one field per entry in display order.
///
/// Multi-line field text keeps its line breaks, indented under the label.
pub fn format_resume(view: &ResumeView) -> Vec<String> {
    let mut lines = Vec::new();
    for field in ResumeField::ALL {
        let mut text = view.get(field).lines();
        let first = text.next().unwrap_or("");
        lines.push(format!("{}: {}", field, first));
        for rest in text {
            lines.push(format!("{}{}", indent(1), rest));
        }
    }
    lines
}

pub fn print_resume(view: &ResumeView) {
    for line in format_resume(view) {
        println!("{}", line);
    }
}
