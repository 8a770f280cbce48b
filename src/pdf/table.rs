use printpdf::{
    path::{PaintMode, WindingOrder},
    Color, IndirectFontRef, Mm, PdfLayerReference, Point, Polygon, Rgb,
};

/// Built-in fonts shared by every table on the page.
pub struct Fonts {
    pub regular: IndirectFontRef,
    pub bold: IndirectFontRef,
}

#[derive(Debug, Clone, Copy)]
pub enum ColumnWidth {
    /// Fixed width in mm.
    Fixed(f32),
    /// Share of the width left over after the fixed columns.
    Auto,
}

/// Visual style of one table.
pub struct TableStyle {
    pub header_fill: Color,
    pub header_text: Color,
    pub body_text: Color,
    pub header_size: f32,
    pub body_size: f32,
    pub body_bold: bool,
}

pub fn rgb255(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

/// One table to draw: position and width, a single header band, body rows
/// with per-column widths, and a style.
///
/// All four tables on the invoice page go through this one primitive, so the
/// reported bottom edge is always exact: rows have a fixed height and the
/// table ends at `y + row_height * (1 + rows.len())`.
pub struct TableSpec {
    /// Left edge, mm from the left of the page.
    pub x: f32,
    /// Top edge, mm from the top of the page.
    pub y: f32,
    pub width: f32,
    pub row_height: f32,
    /// Header cells, one per column. A single-cell header spans the table.
    pub header: Vec<String>,
    pub columns: Vec<ColumnWidth>,
    pub rows: Vec<Vec<String>>,
    pub style: TableStyle,
}

impl TableSpec {
    /// Bottom edge of the table, mm from the top of the page.
    pub fn end_y(&self) -> f32 {
        self.y + self.row_height * (1 + self.rows.len()) as f32
    }

    /// Resolve column widths: fixed columns keep their width, auto columns
    /// split the remainder evenly.
    pub fn column_widths(&self) -> Vec<f32> {
        let fixed: f32 = self
            .columns
            .iter()
            .map(|c| match c {
                ColumnWidth::Fixed(w) => *w,
                ColumnWidth::Auto => 0.0,
            })
            .sum();
        let autos = self
            .columns
            .iter()
            .filter(|c| matches!(c, ColumnWidth::Auto))
            .count();
        let auto_width = if autos > 0 {
            ((self.width - fixed) / autos as f32).max(0.0)
        } else {
            0.0
        };
        self.columns
            .iter()
            .map(|c| match c {
                ColumnWidth::Fixed(w) => *w,
                ColumnWidth::Auto => auto_width,
            })
            .collect()
    }
}

const CELL_PADDING: f32 = 2.0;
const BORDER_GRAY: (u8, u8, u8) = (224, 224, 224);

/// Draw a table and return its bottom edge (mm from the top of the page).
///
/// Coordinates in `spec` are top-down; conversion to PDF's bottom-up space
/// happens here and nowhere else.
pub fn draw_table(layer: &PdfLayerReference, fonts: &Fonts, page_height: f32, spec: &TableSpec) {
    let widths = spec.column_widths();

    layer.set_outline_color(rgb255(BORDER_GRAY.0, BORDER_GRAY.1, BORDER_GRAY.2));
    layer.set_outline_thickness(0.5);

    // Header band: one filled rect across the table, then the header cells.
    fill_rect(
        layer,
        page_height,
        spec.x,
        spec.y,
        spec.width,
        spec.row_height,
        spec.style.header_fill.clone(),
    );
    layer.set_fill_color(spec.style.header_text.clone());
    let mut cell_x = spec.x;
    for (text, width) in spec.header.iter().zip(header_widths(&widths, spec)) {
        text_in_cell(
            layer,
            &fonts.bold,
            page_height,
            cell_x,
            spec.y,
            spec.row_height,
            spec.style.header_size,
            text,
        );
        cell_x += width;
    }

    // Body rows: white cells with a light gray border.
    let body_font = if spec.style.body_bold {
        &fonts.bold
    } else {
        &fonts.regular
    };
    for (row_idx, row) in spec.rows.iter().enumerate() {
        let row_y = spec.y + spec.row_height * (row_idx + 1) as f32;
        let mut cell_x = spec.x;
        for (cell, width) in row.iter().zip(widths.iter()) {
            layer.set_fill_color(rgb255(255, 255, 255));
            bordered_rect(layer, page_height, cell_x, row_y, *width, spec.row_height);
            layer.set_fill_color(spec.style.body_text.clone());
            text_in_cell(
                layer,
                body_font,
                page_height,
                cell_x,
                row_y,
                spec.row_height,
                spec.style.body_size,
                cell,
            );
            cell_x += *width;
        }
    }
}

/// A single-cell header spans the full table width; otherwise headers follow
/// the body columns.
fn header_widths(widths: &[f32], spec: &TableSpec) -> Vec<f32> {
    if spec.header.len() == 1 {
        vec![spec.width]
    } else {
        widths.to_vec()
    }
}

fn rect_polygon(page_height: f32, x: f32, y_top: f32, width: f32, height: f32) -> Polygon {
    // Convert the top-down cell origin to PDF's bottom-up coordinates.
    let top = page_height - y_top;
    let bottom = page_height - (y_top + height);
    let ring = vec![
        (Point::new(Mm(x), Mm(top)), false),
        (Point::new(Mm(x + width), Mm(top)), false),
        (Point::new(Mm(x + width), Mm(bottom)), false),
        (Point::new(Mm(x), Mm(bottom)), false),
    ];
    Polygon {
        rings: vec![ring],
        mode: PaintMode::FillStroke,
        winding_order: WindingOrder::NonZero,
    }
}

fn fill_rect(
    layer: &PdfLayerReference,
    page_height: f32,
    x: f32,
    y_top: f32,
    width: f32,
    height: f32,
    fill: Color,
) {
    layer.set_fill_color(fill);
    layer.add_polygon(rect_polygon(page_height, x, y_top, width, height));
}

fn bordered_rect(
    layer: &PdfLayerReference,
    page_height: f32,
    x: f32,
    y_top: f32,
    width: f32,
    height: f32,
) {
    layer.add_polygon(rect_polygon(page_height, x, y_top, width, height));
}

#[allow(clippy::too_many_arguments)]
fn text_in_cell(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    page_height: f32,
    x: f32,
    y_top: f32,
    row_height: f32,
    size: f32,
    text: &str,
) {
    // Baseline 2mm above the cell bottom.
    let baseline = page_height - (y_top + row_height - CELL_PADDING);
    layer.use_text(text, size, Mm(x + CELL_PADDING), Mm(baseline), font);
}
