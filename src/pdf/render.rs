use std::fs;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::config::{Company, PdfSettings};
use crate::error::{FacturaError, Result};
use crate::form::Snapshot;

use super::table::{draw_table, rgb255, ColumnWidth, Fonts, TableSpec, TableStyle};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT_COL_WIDTH: f32 = 80.0;
const DATE_TABLE_WIDTH: f32 = 60.0;
const AMOUNT_COL_WIDTH: f32 = 30.0;

/// Output filename for a rendered invoice. The client name is embedded
/// verbatim.
pub fn output_filename(client_name: &str) -> String {
    format!("factura_{client_name}.pdf")
}

pub fn format_issue_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn header_style() -> TableStyle {
    TableStyle {
        header_fill: rgb255(33, 150, 243),
        header_text: rgb255(255, 255, 255),
        body_text: rgb255(0, 0, 0),
        header_size: 10.0,
        body_size: 10.0,
        body_bold: false,
    }
}

fn totals_style() -> TableStyle {
    TableStyle {
        header_fill: rgb255(224, 224, 224),
        header_text: rgb255(0, 0, 0),
        body_text: rgb255(0, 0, 0),
        header_size: 11.0,
        body_size: 11.0,
        body_bold: true,
    }
}

/// Render one invoice page to PDF bytes.
///
/// Single pass over a fixed layout: client and issuer tables side by side at
/// the top margin, then the issue date, the line items and the totals, each
/// placed from the previous table's bottom edge. Content past one page is not
/// handled.
pub fn render_to_bytes(
    snapshot: &Snapshot,
    company: &Company,
    settings: &PdfSettings,
    issue_date: NaiveDate,
) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "Factura",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| FacturaError::PdfGeneration(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| FacturaError::PdfGeneration(e.to_string()))?,
    };

    let margin = settings.margin;
    let gap = settings.inter_table_gap;
    let row_height = settings.row_height;

    // Client table, left column.
    let client_table = TableSpec {
        x: margin,
        y: margin,
        width: LEFT_COL_WIDTH,
        row_height,
        header: vec!["DATOS DEL CLIENTE".to_string()],
        columns: vec![ColumnWidth::Auto],
        rows: vec![
            vec![format!("Nombre: {}", snapshot.client_name)],
            vec![format!("Dirección: {}", snapshot.street)],
            vec![format!("CP: {}", snapshot.postal_code)],
            vec![format!("Teléfono: {}", snapshot.phone)],
            vec![format!("CIF/DNI: {}", snapshot.tax_id)],
            vec![format!("Ciudad: {}", snapshot.city)],
        ],
        style: header_style(),
    };
    draw_table(&layer, &fonts, PAGE_HEIGHT, &client_table);

    // Issuer table, right column, same vertical start.
    let issuer_x = margin + LEFT_COL_WIDTH + gap;
    let issuer_table = TableSpec {
        x: issuer_x,
        y: margin,
        width: PAGE_WIDTH - issuer_x - margin,
        row_height,
        header: vec!["DATOS DE LA EMPRESA".to_string()],
        columns: vec![ColumnWidth::Auto],
        rows: company.rows().into_iter().map(|r| vec![r]).collect(),
        style: header_style(),
    };
    draw_table(&layer, &fonts, PAGE_HEIGHT, &issuer_table);

    // Continue below whichever side table reaches further down.
    let cursor = client_table.end_y().max(issuer_table.end_y()) + gap;

    let date_table = TableSpec {
        x: (PAGE_WIDTH - DATE_TABLE_WIDTH) / 2.0,
        y: cursor,
        width: DATE_TABLE_WIDTH,
        row_height,
        header: vec!["Fecha de emisión".to_string()],
        columns: vec![ColumnWidth::Auto],
        rows: vec![vec![format_issue_date(issue_date)]],
        style: header_style(),
    };
    draw_table(&layer, &fonts, PAGE_HEIGHT, &date_table);

    let items_table = TableSpec {
        x: margin,
        y: date_table.end_y() + gap,
        width: PAGE_WIDTH - margin * 2.0,
        row_height,
        header: vec!["Concepto del trabajo".to_string(), "Euros".to_string()],
        columns: vec![ColumnWidth::Auto, ColumnWidth::Fixed(AMOUNT_COL_WIDTH)],
        rows: snapshot
            .line_items
            .iter()
            .map(|item| vec![item.description.clone(), item.amount.clone()])
            .collect(),
        style: header_style(),
    };
    draw_table(&layer, &fonts, PAGE_HEIGHT, &items_table);

    let totals_table = TableSpec {
        x: margin,
        y: items_table.end_y() + gap,
        width: PAGE_WIDTH - margin * 2.0,
        row_height,
        header: vec![
            "Base Imponible".to_string(),
            "IVA".to_string(),
            "Importe IVA".to_string(),
            "Total".to_string(),
        ],
        columns: vec![ColumnWidth::Auto; 4],
        rows: vec![vec![
            snapshot.taxable_base.clone(),
            snapshot.tax_rate.clone(),
            snapshot.tax_amount.clone(),
            snapshot.total.clone(),
        ]],
        style: totals_style(),
    };
    draw_table(&layer, &fonts, PAGE_HEIGHT, &totals_table);

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| FacturaError::PdfGeneration(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| FacturaError::PdfGeneration(e.to_string()))
}

/// Render an invoice and write it to `output_path`.
///
/// The page is rendered to memory first; on any failure nothing is written,
/// so a failed attempt never leaves a partial file behind.
pub fn render_pdf(
    snapshot: &Snapshot,
    company: &Company,
    settings: &PdfSettings,
    issue_date: NaiveDate,
    output_path: &Path,
) -> Result<()> {
    let bytes = render_to_bytes(snapshot, company, settings, issue_date)?;
    fs::write(output_path, bytes)?;
    Ok(())
}
