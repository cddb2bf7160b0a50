//! End-to-end tests through the public library API.
//!
//! Every image is synthesised in memory with the `image` crate; file-system
//! work happens inside `tempfile` directories.

use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use mahatools::compress::{self, CompressEvent};
use mahatools::config::{self, ExportConfig};
use mahatools::grid::{A4_PRINTABLE, MAX_COPIES, QuantityChoice, SizePreset};
use mahatools::imaging::{RustBackend, decode_image, mm_to_px, px_per_mm};
use mahatools::invoice::{Invoice, ItemDraft};
use mahatools::passport::{PassportSettings, PassportTool};
use mahatools::render;
use std::io::Cursor;
use tempfile::TempDir;

fn photo_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 200) as u8, (y % 200) as u8, 90])
    });
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut cursor, format)
        .unwrap();
    cursor.into_inner()
}

#[test]
fn passport_sheet_from_photo_to_jpeg() {
    let mut tool = PassportTool::new(
        RustBackend::new(),
        RustBackend::new(),
        PassportSettings::default(),
    );

    let sheet = tool
        .capture(Some(photo_bytes(1000, 800, ImageFormat::Jpeg)))
        .unwrap()
        .unwrap()
        .clone();
    assert_eq!(sheet.layout.count, 25);
    assert_eq!((sheet.columns, sheet.rows), (5, 5));

    let photo = tool.photo().unwrap();
    assert_eq!((photo.width(), photo.height()), (600, 771));

    let encoded = tool.export_jpeg(&ExportConfig::default()).unwrap().unwrap();
    let decoded = decode_image(&encoded.bytes).unwrap();
    assert_eq!(decoded.dimensions(), (encoded.width, encoded.height));

    // Right margin past the fifth column (5 x 37mm = 185mm) is background
    let ppm = px_per_mm(2.0);
    let x = mm_to_px(188.0, ppm).min(decoded.width() - 1);
    let y = mm_to_px(10.0, ppm);
    let px = decoded.to_rgb8().get_pixel(x, y).0;
    assert!(px.iter().all(|c| *c > 235), "expected white, got {px:?}");
}

#[test]
fn passport_settings_follow_config_file() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join(config::CONFIG_FILENAME),
        "[passport]\npreset = \"stamp\"\nquantity = \"8\"\ngap_mm = 0\n",
    )
    .unwrap();

    let tools_config = config::load_config(tmp.path()).unwrap();
    let settings = PassportSettings::from_config(&tools_config.passport);
    assert_eq!(settings.preset, SizePreset::Stamp);
    assert_eq!(settings.quantity, QuantityChoice::Fixed(8));

    let sheet = settings.sheet(A4_PRINTABLE);
    assert_eq!(sheet.layout.count, 8);
    assert_eq!(sheet.layout.cell_width_mm, 20.0);
    // 190 / 20 = 9 columns, so 8 copies fit on one row
    assert_eq!(sheet.rows, 1);
}

#[test]
fn custom_size_and_quantity_overflow_the_page() {
    let settings = PassportSettings {
        preset: SizePreset::Custom,
        custom_width: "-5".into(),
        custom_height: "abc".into(),
        quantity: QuantityChoice::Custom,
        custom_quantity: "60".into(),
        gap: "-3".into(),
    };
    let sheet = settings.sheet(A4_PRINTABLE);
    // Bad custom sizes fall back to 35x45, bad gap to 0
    assert_eq!(sheet.layout.cell_width_mm, 35.0);
    assert_eq!(sheet.layout.cell_height_mm, 45.0);
    assert_eq!(sheet.gap_mm, 0.0);
    assert_eq!(sheet.layout.count, 60);
    assert_eq!(sheet.columns, 5);
    assert_eq!(sheet.rows, 12);
    assert!(sheet.height_mm > A4_PRINTABLE.height_mm);
}

#[test]
fn absurd_form_values_give_a_capped_sheet() {
    let settings = PassportSettings {
        preset: SizePreset::Custom,
        custom_width: "0.001".into(),
        custom_height: "0.001".into(),
        quantity: QuantityChoice::Custom,
        custom_quantity: "5000000000".into(),
        gap: "0".into(),
    };
    let sheet = settings.sheet(A4_PRINTABLE);
    assert_eq!(sheet.layout.count, MAX_COPIES);
    assert_eq!(sheet.cells.len(), MAX_COPIES as usize);

    let auto = PassportSettings {
        quantity: QuantityChoice::Max,
        ..settings
    };
    assert_eq!(auto.layout(A4_PRINTABLE).count, MAX_COPIES);
}

#[test]
fn compress_directory_in_place() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("scan.png"),
        photo_bytes(1000, 1000, ImageFormat::Png),
    )
    .unwrap();
    std::fs::write(tmp.path().join("readme.txt"), "not an image").unwrap();

    let inputs = compress::collect_inputs(&[tmp.path().to_path_buf()]).unwrap();
    assert_eq!(inputs.len(), 1);

    let (tx, rx) = std::sync::mpsc::channel();
    let summary = compress::compress_batch(&inputs, None, Some(tx)).unwrap();
    let events: Vec<CompressEvent> = rx.iter().collect();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 0);
    assert!(matches!(
        events.as_slice(),
        [CompressEvent::Done {
            width: 600,
            height: 600,
            ..
        }]
    ));

    let written = std::fs::read(tmp.path().join("scan-compressed.jpg")).unwrap();
    let decoded = image::load_from_memory_with_format(&written, ImageFormat::Jpeg).unwrap();
    assert_eq!(decoded.dimensions(), (600, 600));
}

#[test]
fn invoice_drafts_render_and_serialize() {
    let mut invoice = Invoice::new(chrono::NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    invoice.set_client("Asha Traders");

    for spec in ["Pen,2,10", "Book,1,150", "Broken,0,5", ",1,1"] {
        let mut draft = ItemDraft::from_spec(spec);
        let _ = draft.submit(&mut invoice);
    }
    assert_eq!(invoice.items().len(), 2);
    assert_eq!(invoice.total(), 170.0);

    let html = render::render_invoice_page(&invoice, "₹", "%d/%m/%Y").into_string();
    assert!(html.contains("Asha Traders"));
    assert!(html.contains("₹170.00"));

    let json: serde_json::Value = serde_json::to_value(&invoice).unwrap();
    assert_eq!(json["client"], "Asha Traders");
    assert_eq!(json["date"], "2026-10-18");
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["total"], 170.0);
}

#[test]
fn stock_config_is_loadable() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join(config::CONFIG_FILENAME),
        config::stock_config_toml(),
    )
    .unwrap();
    let loaded = config::load_config(tmp.path()).unwrap();
    assert_eq!(loaded.export.file_name, "MahaTools-Passport.jpg");
    assert_eq!(loaded.invoice.currency, "₹");
}
