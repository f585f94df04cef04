//! Printable session vouchers: a QR code pointing at the public ordering
//! URL, laid out on a titled PDF page.

use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rect, Rgb};
use qrcode::{Color as ModuleColor, EcLevel, QrCode};
use tracing::error;

use crate::{prelude::*, Error};

/// Pure artifact renderer: `(text, title, page_size, qr_size)` to PDF bytes.
///
/// Sizes are in PDF points. Persisting the output is the caller's concern,
/// which keeps render failures distinct from save failures.
pub trait VoucherRenderer: Send + Sync {
    fn render(
        &self,
        text: &str,
        title: &str,
        page_size: (f64, f64),
        qr_size: f64,
    ) -> Result<Vec<u8>>;
}

/// Default renderer over the `qrcode` and `printpdf` crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrVoucherRenderer;

const PT_PER_MM: f64 = 72.0 / 25.4;
const PAGE_MARGIN_PT: f64 = 40.0;
const TITLE_FONT_SIZE: f64 = 24.0;

fn pt_to_mm(pt: f64) -> Mm {
    Mm((pt / PT_PER_MM) as f32)
}

impl VoucherRenderer for QrVoucherRenderer {
    fn render(
        &self,
        text: &str,
        title: &str,
        page_size: (f64, f64),
        qr_size: f64,
    ) -> Result<Vec<u8>> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M)
            .map_err(|e| {
                error!(%e, "failed to encode voucher QR code");
                Error::VoucherRender(e.to_string())
            })?;

        let (page_w, page_h) = page_size;
        let (doc, page, layer) =
            PdfDocument::new(title, pt_to_mm(page_w), pt_to_mm(page_h), "voucher");
        let layer = doc.get_page(page).get_layer(layer);

        let font = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| Error::VoucherRender(e.to_string()))?;

        // Centered title near the top. Helvetica glyphs average roughly half
        // the font size in width, close enough for a voucher heading.
        let title_width_pt = title.chars().count() as f64 * TITLE_FONT_SIZE * 0.5;
        let title_x = (page_w - title_width_pt).max(0.0) / 2.0;
        let title_y = page_h - PAGE_MARGIN_PT - TITLE_FONT_SIZE;
        layer.use_text(
            title,
            TITLE_FONT_SIZE as f32,
            pt_to_mm(title_x),
            pt_to_mm(title_y),
            &font,
        );

        // QR modules drawn as filled squares, centered on the page.
        layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        let modules = code.width();
        let module_pt = qr_size / modules as f64;
        let origin_x = (page_w - qr_size) / 2.0;
        let origin_y = (page_h - qr_size) / 2.0 - PAGE_MARGIN_PT;

        for (position, color) in code.to_colors().into_iter().enumerate() {
            if color != ModuleColor::Dark {
                continue;
            }
            let row = position / modules;
            let col = position % modules;
            let low_x = origin_x + col as f64 * module_pt;
            let low_y = origin_y + qr_size - (row + 1) as f64 * module_pt;
            layer.add_rect(Rect::new(
                pt_to_mm(low_x),
                pt_to_mm(low_y),
                pt_to_mm(low_x + module_pt),
                pt_to_mm(low_y + module_pt),
            ));
        }

        doc.save_to_bytes().map_err(|e| {
            error!(%e, "failed to serialize voucher PDF");
            Error::VoucherRender(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_produces_pdf_bytes() {
        let renderer = QrVoucherRenderer;
        let bytes = renderer
            .render(
                "http://127.0.0.1:8080/api/v1/public?session_id=abc",
                "abc",
                (595.0, 842.0),
                512.0,
            )
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_empty_text_still_encodes() {
        let renderer = QrVoucherRenderer;
        assert!(renderer.render("", "empty", (595.0, 842.0), 256.0).is_ok());
    }
}
