use printpdf::{IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::invoice::{InvoiceDocument, InvoiceError};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 7.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;

/// Column offsets from the left margin: position, name, quantity, unit, price, amount.
const COLUMNS: [f32; 6] = [0.0, 10.0, 95.0, 115.0, 130.0, 152.0];

/// Unicode TrueType face embedded in every invoice. The PDF base fonts only
/// cover Latin-1, which garbles Cyrillic product names and addresses.
const FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Render an A4 invoice. Lines that do not fit continue on following pages.
pub fn render_pdf(document: &InvoiceDocument) -> Result<Vec<u8>, InvoiceError> {
    let (pdf, page, layer) = PdfDocument::new(
        document.number.as_str(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "invoice",
    );
    let font = pdf
        .add_external_font(FONT)
        .map_err(|err| InvoiceError::Pdf(err.to_string()))?;

    let mut layer = pdf.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    layer.use_text(
        format!("Invoice {}", document.number),
        TITLE_SIZE,
        Mm(MARGIN),
        Mm(y),
        &font,
    );
    y -= LINE_HEIGHT * 2.0;

    for line in [
        format!("Order: #{}", document.order_id),
        format!("Date: {}", document.issued_at.format("%Y-%m-%d %H:%M")),
        format!("Status: {}", document.status),
        format!("Supplier: {}", document.executor),
        format!("Customer: {}", document.customer),
    ] {
        layer.use_text(line, BODY_SIZE, Mm(MARGIN), Mm(y), &font);
        y -= LINE_HEIGHT;
    }
    y -= LINE_HEIGHT;

    write_header(&layer, y, &font);
    y -= LINE_HEIGHT;

    let mut page_number = 1;
    for line in &document.lines {
        if y < MARGIN + LINE_HEIGHT {
            page_number += 1;
            let (next_page, next_layer) = pdf.add_page(
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
                format!("invoice page {page_number}"),
            );
            layer = pdf.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT - MARGIN;
            write_header(&layer, y, &font);
            y -= LINE_HEIGHT;
        }

        let cells = [
            line.position.to_string(),
            truncate(&line.name, 48),
            line.quantity.to_string(),
            line.unit.clone(),
            line.price.clone(),
            line.total.clone(),
        ];
        write_row(&layer, y, &font, cells);
        y -= LINE_HEIGHT;
    }

    if y < MARGIN + LINE_HEIGHT {
        let (next_page, next_layer) =
            pdf.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "invoice total");
        layer = pdf.get_page(next_page).get_layer(next_layer);
        y = PAGE_HEIGHT - MARGIN;
    }
    layer.use_text(
        format!("Total: {}", document.total),
        BODY_SIZE + 2.0,
        Mm(MARGIN + COLUMNS[4]),
        Mm(y - LINE_HEIGHT / 2.0),
        &font,
    );

    pdf.save_to_bytes()
        .map_err(|err| InvoiceError::Pdf(err.to_string()))
}

fn write_header(layer: &PdfLayerReference, y: f32, font: &IndirectFontRef) {
    let titles = ["#", "Product", "Qty", "Unit", "Price", "Amount"].map(String::from);
    write_row(layer, y, font, titles);
}

fn write_row(layer: &PdfLayerReference, y: f32, font: &IndirectFontRef, cells: [String; 6]) {
    for (offset, text) in COLUMNS.iter().zip(cells) {
        layer.use_text(text, BODY_SIZE, Mm(MARGIN + offset), Mm(y), font);
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max_chars - 1).collect();
    shortened.push('~');
    shortened
}
