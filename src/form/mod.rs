mod file;
mod model;
mod totals;
mod validate;

pub use file::{load_form, ClientFields, FormFile, LineEntry};
pub use model::{InvoiceForm, LineItem, Snapshot};
pub use totals::{compute_totals, format_money, parse_amount, round2, Totals};
