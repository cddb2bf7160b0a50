//! Tool configuration.
//!
//! Handles loading, validating, and layering `config.toml`. Stock defaults
//! are the base layer; a `config.toml` in the config directory overrides any
//! subset of keys; command-line flags override both for a single run.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [passport]
//! preset = "indian"          # indian | stamp | visa | pan | custom
//! quantity = "max"           # max | custom | 4 | 6 | 8 | 10 | 12
//! gap_mm = 2.0               # Space between photos
//! custom_width_mm = 35.0     # Used when preset = "custom"
//! custom_height_mm = 45.0
//!
//! [export]
//! scale = 2.0                # Multiplier over 96 px/inch
//! quality = 90               # JPEG quality (1-100)
//! background = "#ffffff"
//! file_name = "MahaTools-Passport.jpg"
//!
//! [invoice]
//! currency = "₹"
//! date_format = "%d/%m/%Y"   # chrono strftime syntax
//!
//! [processing]
//! max_processes = 4          # Max parallel compressions (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::grid::{QuantityChoice, SizePreset};
use crate::imaging::{Quality, RenderOptions, parse_hex_color};
use crate::invoice;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete tool configuration.
///
/// All fields have defaults; user files only specify what they override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Passport sheet defaults (size, quantity, gap).
    pub passport: PassportConfig,
    /// Sheet export settings.
    pub export: ExportConfig,
    /// Invoice presentation.
    pub invoice: InvoiceConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl ToolsConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.passport;
        if !p.gap_mm.is_finite() || p.gap_mm < 0.0 {
            return Err(ConfigError::Validation(
                "passport.gap_mm must be 0 or more".into(),
            ));
        }
        if !(p.custom_width_mm > 0.0 && p.custom_height_mm > 0.0) {
            return Err(ConfigError::Validation(
                "passport.custom_width_mm and custom_height_mm must be positive".into(),
            ));
        }
        let e = &self.export;
        if !(e.scale > 0.0 && e.scale <= 8.0) {
            return Err(ConfigError::Validation(
                "export.scale must be in (0, 8]".into(),
            ));
        }
        if !(1..=100).contains(&e.quality) {
            return Err(ConfigError::Validation(
                "export.quality must be 1-100".into(),
            ));
        }
        if parse_hex_color(&e.background).is_none() {
            return Err(ConfigError::Validation(format!(
                "export.background must be a #rrggbb color, got '{}'",
                e.background
            )));
        }
        if e.file_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.file_name must not be empty".into(),
            ));
        }
        let sample = chrono::NaiveDate::from_ymd_opt(2000, 1, 31);
        let date_ok = !self.invoice.date_format.trim().is_empty()
            && sample
                .and_then(|d| invoice::try_format_date(d, &self.invoice.date_format))
                .is_some();
        if !date_ok {
            return Err(ConfigError::Validation(format!(
                "invoice.date_format '{}' is not a usable strftime pattern",
                self.invoice.date_format
            )));
        }
        Ok(())
    }
}

/// Passport sheet defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassportConfig {
    pub preset: SizePreset,
    pub quantity: QuantityChoice,
    pub gap_mm: f64,
    pub custom_width_mm: f64,
    pub custom_height_mm: f64,
}

impl Default for PassportConfig {
    fn default() -> Self {
        Self {
            preset: SizePreset::Indian,
            quantity: QuantityChoice::Max,
            gap_mm: 2.0,
            custom_width_mm: 35.0,
            custom_height_mm: 45.0,
        }
    }
}

/// How the sheet is rasterised and saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Multiplier over CSS pixel density (96 px/inch).
    pub scale: f64,
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Sheet background as `#rrggbb`.
    pub background: String,
    /// Default output file name.
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            quality: 90,
            background: "#ffffff".to_string(),
            file_name: "MahaTools-Passport.jpg".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            scale: self.scale,
            background: parse_hex_color(&self.background)
                .unwrap_or(RenderOptions::default().background),
        }
    }

    pub fn jpeg_quality(&self) -> Quality {
        Quality::new(self.quality)
    }
}

/// Invoice presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InvoiceConfig {
    /// Symbol printed before every amount.
    pub currency: String,
    /// strftime format for the invoice date.
    pub date_format: String,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            currency: "₹".to_string(),
            date_format: invoice::DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel compression workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ToolsConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ToolsConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ToolsConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config for a directory: stock defaults + `config.toml`.
pub fn load_config(dir: &Path) -> Result<ToolsConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// A documented `config.toml` with every option at its default.
pub fn stock_config_toml() -> &'static str {
    r##"# mahatools configuration
#
# Place this file as config.toml in the directory passed with --config-dir
# (default: the current directory). Every key is optional; omitted keys keep
# the values shown here. Unknown keys will cause an error.

[passport]
# Print size: indian (35x45mm), stamp (20x25mm), visa (50.8x50.8mm),
# pan (25x35mm) or custom (uses custom_width_mm / custom_height_mm).
preset = "indian"
# Copies per sheet: "max" fits as many as the A4 page allows,
# "custom" reads --custom-quantity, or one of "4", "6", "8", "10", "12".
quantity = "max"
# Space between photos in millimetres.
gap_mm = 2.0
custom_width_mm = 35.0
custom_height_mm = 45.0

[export]
# Render scale over 96 px/inch. 2.0 gives ~192 dpi.
scale = 2.0
# JPEG quality, 1-100.
quality = 90
background = "#ffffff"
file_name = "MahaTools-Passport.jpg"

[invoice]
currency = "₹"
# chrono strftime format for the invoice date.
date_format = "%d/%m/%Y"

[processing]
# Maximum parallel workers for batch compression. Defaults to CPU cores.
# max_processes = 4
"##
}
