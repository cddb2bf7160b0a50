//! Passport photo tool: the current photo, the form, and the printable sheet.
//!
//! [`PassportTool`] is the one place where capture and grid layout meet. It
//! owns the current-photo slot (through its [`CapturePipeline`]) and keeps a
//! derived [`GridSheet`] in step with it: whenever a photo becomes ready or a
//! setting changes, the sheet is recomputed from scratch. Without a photo
//! there is no sheet and nothing to export.

use crate::capture::{CaptureError, CapturePipeline, Photo};
use crate::config::{ExportConfig, PassportConfig};
use crate::grid::{
    self, A4_PRINTABLE, GridLayout, GridSheet, PageSize, PrintUnit, QuantityChoice, QuantityMode,
    SizePreset,
};
use crate::imaging::{CropTool, EncodedImage, ImagingError, Rasterizer, render_sheet_jpeg};
use crate::session::Ticket;
use tracing::{debug, info};

/// The passport form as entered. Free-text fields stay raw until resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PassportSettings {
    pub preset: SizePreset,
    pub custom_width: String,
    pub custom_height: String,
    pub quantity: QuantityChoice,
    pub custom_quantity: String,
    pub gap: String,
}

impl Default for PassportSettings {
    fn default() -> Self {
        Self::from_config(&PassportConfig::default())
    }
}

impl PassportSettings {
    pub fn from_config(config: &PassportConfig) -> Self {
        Self {
            preset: config.preset,
            custom_width: config.custom_width_mm.to_string(),
            custom_height: config.custom_height_mm.to_string(),
            quantity: config.quantity,
            custom_quantity: String::new(),
            gap: config.gap_mm.to_string(),
        }
    }

    pub fn unit(&self) -> PrintUnit {
        self.preset.resolve(&self.custom_width, &self.custom_height)
    }

    pub fn gap_mm(&self) -> f64 {
        grid::gap_from_input(&self.gap)
    }

    pub fn mode(&self) -> QuantityMode {
        self.quantity.to_mode(&self.custom_quantity)
    }

    /// Count and cell size for the current form on `page`.
    pub fn layout(&self, page: PageSize) -> GridLayout {
        grid::compute_grid(self.unit(), self.gap_mm(), self.mode(), page)
    }

    /// Full arrangement for the current form on `page`.
    pub fn sheet(&self, page: PageSize) -> GridSheet {
        grid::arrange(self.layout(page), self.gap_mm(), page)
    }
}

pub struct PassportTool<C: CropTool, R: Rasterizer> {
    pipeline: CapturePipeline<C>,
    rasterizer: R,
    settings: PassportSettings,
    page: PageSize,
    sheet: Option<GridSheet>,
}

impl<C: CropTool, R: Rasterizer> PassportTool<C, R> {
    pub fn new(crop_tool: C, rasterizer: R, settings: PassportSettings) -> Self {
        Self {
            pipeline: CapturePipeline::new(crop_tool),
            rasterizer,
            settings,
            page: A4_PRINTABLE,
            sheet: None,
        }
    }

    pub fn settings(&self) -> &PassportSettings {
        &self.settings
    }

    pub fn photo(&self) -> Option<&Photo> {
        self.pipeline.photo()
    }

    /// The sheet for the current photo and settings, if there is a photo.
    pub fn sheet(&self) -> Option<&GridSheet> {
        self.sheet.as_ref()
    }

    /// Replace the form and regenerate.
    pub fn set_settings(&mut self, settings: PassportSettings) -> Option<&GridSheet> {
        self.settings = settings;
        self.generate_grid()
    }

    /// Recompute the sheet from the current photo and settings.
    ///
    /// Returns `None` and clears any old sheet when there is no photo.
    pub fn generate_grid(&mut self) -> Option<&GridSheet> {
        self.sheet = self.pipeline.photo().map(|_| self.settings.sheet(self.page));
        if let Some(sheet) = &self.sheet {
            debug!(
                count = sheet.layout.count,
                columns = sheet.columns,
                rows = sheet.rows,
                cell_width_mm = sheet.layout.cell_width_mm,
                cell_height_mm = sheet.layout.cell_height_mm,
                gap_mm = sheet.gap_mm,
                "passport: sheet regenerated"
            );
        }
        self.sheet.as_ref()
    }

    /// Start capturing a new file; the previous photo and sheet are discarded.
    pub fn select(&mut self, file: Option<Vec<u8>>) -> Option<Ticket> {
        let ticket = self.pipeline.select(file)?;
        self.sheet = None;
        Some(ticket)
    }

    pub fn decode(&mut self, ticket: Ticket) -> Result<(), CaptureError> {
        self.pipeline.decode(ticket)
    }

    /// Confirm the crop; a ready photo regenerates the sheet.
    pub fn confirm_crop(&mut self, ticket: Ticket) -> Result<Option<&GridSheet>, CaptureError> {
        self.pipeline.confirm_crop(ticket)?;
        Ok(self.generate_grid())
    }

    pub fn cancel(&mut self) {
        self.pipeline.cancel();
        self.sheet = None;
    }

    /// Run a whole capture and regenerate. No file leaves everything as it was.
    pub fn capture(&mut self, file: Option<Vec<u8>>) -> Result<Option<&GridSheet>, CaptureError> {
        let Some(ticket) = self.select(file) else {
            return Ok(self.sheet.as_ref());
        };
        self.decode(ticket)?;
        self.confirm_crop(ticket)
    }

    /// Rasterise the current sheet as JPEG. `None` when there is no photo.
    pub fn export_jpeg(
        &self,
        export: &ExportConfig,
    ) -> Result<Option<EncodedImage>, ImagingError> {
        let (Some(sheet), Some(photo)) = (self.sheet.as_ref(), self.pipeline.photo()) else {
            return Ok(None);
        };
        let encoded = render_sheet_jpeg(
            &self.rasterizer,
            sheet,
            photo.image(),
            &export.render_options(),
            export.jpeg_quality(),
        )?;
        info!(
            width = encoded.width,
            height = encoded.height,
            bytes = encoded.bytes.len(),
            "passport: sheet exported"
        );
        Ok(Some(encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RustBackend;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::png_bytes;

    fn mock_tool() -> PassportTool<MockBackend, MockBackend> {
        PassportTool::new(
            MockBackend::new(),
            MockBackend::new(),
            PassportSettings::default(),
        )
    }

    #[test]
    fn default_settings_match_config() {
        let s = PassportSettings::default();
        assert_eq!(s.preset, SizePreset::Indian);
        assert_eq!(s.quantity, QuantityChoice::Max);
        assert_eq!(s.gap_mm(), 2.0);
        assert_eq!(s.layout(A4_PRINTABLE).count, 25);
    }

    #[test]
    fn custom_fields_only_used_for_custom_preset() {
        let mut s = PassportSettings {
            custom_width: "40".into(),
            custom_height: "50".into(),
            ..PassportSettings::default()
        };
        assert_eq!(s.unit().width_mm, 35.0);
        s.preset = SizePreset::Custom;
        assert_eq!(s.unit().width_mm, 40.0);
        assert_eq!(s.unit().height_mm, 50.0);
    }

    #[test]
    fn custom_quantity_from_text() {
        let s = PassportSettings {
            quantity: QuantityChoice::Custom,
            custom_quantity: "7".into(),
            ..PassportSettings::default()
        };
        assert_eq!(s.layout(A4_PRINTABLE).count, 7);
    }

    #[test]
    fn no_photo_means_no_sheet() {
        let mut tool = mock_tool();
        assert!(tool.generate_grid().is_none());
        assert!(tool.export_jpeg(&ExportConfig::default()).unwrap().is_none());
    }

    #[test]
    fn capture_regenerates_sheet() {
        let mut tool = mock_tool();
        let sheet = tool.capture(Some(png_bytes(40, 40))).unwrap().unwrap();
        assert_eq!(sheet.layout.count, 25);
        assert_eq!(sheet.cells.len(), 25);
    }

    #[test]
    fn settings_change_regenerates() {
        let mut tool = mock_tool();
        tool.capture(Some(png_bytes(40, 40))).unwrap();
        let settings = PassportSettings {
            quantity: QuantityChoice::Fixed(8),
            ..tool.settings().clone()
        };
        assert_eq!(tool.set_settings(settings).unwrap().layout.count, 8);
    }

    #[test]
    fn new_selection_clears_sheet() {
        let mut tool = mock_tool();
        tool.capture(Some(png_bytes(40, 40))).unwrap();
        tool.select(Some(png_bytes(20, 20)));
        assert!(tool.sheet().is_none());
        assert!(tool.photo().is_none());
    }

    #[test]
    fn capture_without_file_keeps_sheet() {
        let mut tool = mock_tool();
        tool.capture(Some(png_bytes(40, 40))).unwrap();
        assert!(tool.capture(None).unwrap().is_some());
    }

    #[test]
    fn cancel_clears_sheet() {
        let mut tool = mock_tool();
        let ticket = tool.select(Some(png_bytes(40, 40))).unwrap();
        tool.decode(ticket).unwrap();
        tool.cancel();
        assert!(tool.photo().is_none());
        assert!(matches!(
            tool.confirm_crop(ticket),
            Err(CaptureError::Superseded)
        ));
    }

    #[test]
    fn export_passes_sheet_to_rasterizer() {
        let mut tool = mock_tool();
        tool.capture(Some(png_bytes(40, 40))).unwrap();
        let encoded = tool.export_jpeg(&ExportConfig::default()).unwrap().unwrap();
        assert_eq!((encoded.width, encoded.height), (10, 10));
        assert_eq!(
            tool.rasterizer.get_operations(),
            vec![RecordedOp::Render {
                cells: 25,
                photo: (600, 771),
                scale: 2.0,
            }]
        );
    }

    #[test]
    fn real_backend_exports_jpeg() {
        let settings = PassportSettings {
            quantity: QuantityChoice::Fixed(4),
            ..PassportSettings::default()
        };
        let mut tool = PassportTool::new(RustBackend::new(), RustBackend::new(), settings);
        tool.capture(Some(png_bytes(120, 160))).unwrap();
        let export = ExportConfig {
            scale: 1.0,
            ..ExportConfig::default()
        };
        let encoded = tool.export_jpeg(&export).unwrap().unwrap();
        assert_eq!(&encoded.bytes[..2], &[0xFF, 0xD8]);
        assert!(encoded.width > 0 && encoded.height > 0);
    }
}
