mod render;
mod table;

pub use render::{format_issue_date, output_filename, render_pdf, render_to_bytes};
pub use table::{draw_table, ColumnWidth, Fonts, TableSpec, TableStyle};
