pub mod config;
pub mod error;
pub mod form;
pub mod pdf;

pub use config::{Company, Config, PdfSettings};
pub use error::{FacturaError, Result};
pub use form::{InvoiceForm, LineItem, Snapshot};
pub use pdf::{output_filename, render_pdf};
