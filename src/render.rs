//! HTML previews for the passport sheet, the invoice and the resume.
//!
//! Each `render_*` function returns a complete standalone document. Styles
//! are embedded at compile time from `static/preview.css`, so a written
//! preview opens correctly on its own. All text is interpolated through
//! [maud](https://maud.lambda.xyz/) and therefore escaped.
//!
//! Sheet geometry is expressed in millimetres so that printing the page at
//! 100% reproduces the physical photo size.

use crate::grid::GridSheet;
use crate::invoice::{self, Invoice};
use crate::resume::ResumeView;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const PREVIEW_CSS: &str = include_str!("../static/preview.css");

/// Renders the base HTML document structure
fn base_document(title: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(PREVIEW_CSS)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Millimetre length as a CSS value, trimmed of float noise.
fn mm(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format!("{rounded}mm")
}

/// The sheet with every cell showing `photo_src`.
pub fn render_grid_page(sheet: &GridSheet, photo_src: &str) -> Markup {
    let sheet_style = format!(
        "width: {}; height: {};",
        mm(sheet.width_mm),
        mm(sheet.height_mm)
    );
    let cell_size = format!(
        "width: {}; height: {};",
        mm(sheet.layout.cell_width_mm),
        mm(sheet.layout.cell_height_mm)
    );
    let content = html! {
        @if sheet.cells.is_empty() {
            p.sheet-empty { "No photos to print." }
        }
        div.sheet style=(sheet_style) {
            @for cell in &sheet.cells {
                img.cell
                    src=(photo_src)
                    alt="Passport photo"
                    style={ "left: " (mm(cell.x_mm)) "; top: " (mm(cell.y_mm)) "; " (cell_size) };
            }
        }
    };
    base_document("Passport Photos", Some("passport-sheet"), content)
}

/// Bill header, line items and grand total.
pub fn render_invoice_page(invoice: &Invoice, currency: &str, date_format: &str) -> Markup {
    let content = html! {
        div.invoice {
            header {
                div {
                    h2 { "Bill To" }
                    p.client { (invoice.client_display()) }
                }
                div {
                    h2 { "Date" }
                    p.date { (invoice::format_date(invoice.date(), date_format)) }
                }
            }
            table {
                thead {
                    tr {
                        th { "Item" }
                        th.num { "Qty" }
                        th.num { "Price" }
                        th.num { "Total" }
                    }
                }
                tbody {
                    @for item in invoice.items() {
                        tr {
                            td { (item.description) }
                            td.num { (invoice::format_quantity(item.quantity)) }
                            td.num { (invoice::format_money(currency, item.unit_price)) }
                            td.num { (invoice::format_money(currency, item.total())) }
                        }
                    }
                }
            }
            p.grand-total {
                "Grand Total: "
                span.amount { (invoice::format_money(currency, invoice.total())) }
            }
        }
    };
    base_document("Invoice", Some("invoice-page"), content)
}

pub fn render_resume_page(view: &ResumeView) -> Markup {
    let content = html! {
        div.resume {
            h1.name { (view.name) }
            p.job { (view.job) }
            p.contact { (view.contact) }
            p.address { (view.address) }
            section {
                h2 { "Education" }
                p.body { (view.education) }
            }
            section {
                h2 { "Experience" }
                p.body { (view.experience) }
            }
        }
    };
    base_document(&view.name, Some("resume-page"), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{A4_PRINTABLE, GridLayout, arrange};
    use crate::resume::{ResumeField, ResumeMirror};
    use chrono::NaiveDate;

    fn sheet(count: u32) -> GridSheet {
        arrange(
            GridLayout {
                count,
                cell_width_mm: 35.0,
                cell_height_mm: 45.0,
            },
            2.0,
            A4_PRINTABLE,
        )
    }

    #[test]
    fn base_document_includes_doctype() {
        let content = html! { p { "test" } };
        let doc = base_document("Test", None, content).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Test</title>"));
    }

    #[test]
    fn base_document_applies_body_class() {
        let doc = base_document("Test", Some("invoice-page"), html! {}).into_string();
        assert!(doc.contains(r#"<body class="invoice-page">"#));
    }

    #[test]
    fn grid_page_has_one_image_per_cell() {
        let html = render_grid_page(&sheet(6), "photo.jpg").into_string();
        assert_eq!(html.matches(r#"src="photo.jpg""#).count(), 6);
        assert!(html.contains("width: 190mm; height: 277mm;"));
    }

    #[test]
    fn grid_page_positions_in_mm() {
        let html = render_grid_page(&sheet(6), "p.jpg").into_string();
        // second cell sits one pitch (35 + 2) to the right
        assert!(html.contains("left: 37mm; top: 0mm; width: 35mm; height: 45mm;"));
        // sixth cell wraps to the second row (5 columns)
        assert!(html.contains("left: 0mm; top: 47mm;"));
    }

    #[test]
    fn grid_page_empty_sheet() {
        let html = render_grid_page(&sheet(0), "p.jpg").into_string();
        assert!(html.contains("No photos to print."));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn mm_trims_float_noise() {
        assert_eq!(mm(0.1 + 0.2), "0.3mm");
        assert_eq!(mm(50.8), "50.8mm");
    }

    #[test]
    fn invoice_page_lists_items_and_total() {
        let mut inv = Invoice::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        inv.set_client("Asha Traders");
        inv.add_item("Pen", 2.0, 10.0).unwrap();
        inv.add_item("Book", 1.5, 100.0).unwrap();

        let html = render_invoice_page(&inv, "₹", "%d/%m/%Y").into_string();
        assert!(html.contains("Asha Traders"));
        assert!(html.contains("18/10/2026"));
        assert!(html.contains("<td>Pen</td>"));
        assert!(html.contains(">1.5<"));
        assert!(html.contains("₹150.00"));
        assert!(html.contains("₹170.00"));
    }

    #[test]
    fn invoice_page_default_client() {
        let inv = Invoice::new(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        let html = render_invoice_page(&inv, "$", "%Y-%m-%d").into_string();
        assert!(html.contains("Client Name"));
        assert!(html.contains("2026-01-02"));
        assert!(html.contains("$0.00"));
    }

    #[test]
    fn resume_page_shows_placeholders_and_text() {
        let mut mirror = ResumeMirror::new();
        mirror.edit(ResumeField::Name, "Priya Patil");
        let html = render_resume_page(mirror.view()).into_string();
        assert!(html.contains("<title>Priya Patil</title>"));
        assert!(html.contains("Designation"));
        assert!(html.contains("Experience Details..."));
    }

    #[test]
    fn text_is_escaped() {
        let mut mirror = ResumeMirror::new();
        mirror.edit(ResumeField::Job, "<script>alert('x')</script>");
        let html = render_resume_page(mirror.view()).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));

        let mut inv = Invoice::new(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        inv.add_item("<b>bold</b>", 1.0, 1.0).unwrap();
        let html = render_invoice_page(&inv, "₹", "%d/%m/%Y").into_string();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }
}
