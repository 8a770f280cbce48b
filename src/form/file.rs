use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{FacturaError, Result};

use super::model::InvoiceForm;

/// On-disk shape of a form file (`factura.toml`).
#[derive(Debug, Deserialize)]
pub struct FormFile {
    #[serde(default = "default_tax_rate")]
    pub tax_rate: String,
    pub client: ClientFields,
    #[serde(default)]
    pub lines: Vec<LineEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ClientFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct LineEntry {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: String,
}

fn default_tax_rate() -> String {
    "0".to_string()
}

/// Load and parse a form file.
pub fn load_form(path: &Path) -> Result<FormFile> {
    if !path.exists() {
        return Err(FacturaError::FormFileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| FacturaError::FormParse {
        path: path.to_path_buf(),
        source: e,
    })
}

impl InvoiceForm {
    /// Build a form from a parsed file by replaying it through the normal
    /// edit operations, so file input takes the same validated path as
    /// interactive edits and the totals are already derived afterwards.
    pub fn from_file(file: &FormFile) -> Result<Self> {
        let mut form = Self::new();
        form.set_field("client.name", &file.client.name)?;
        form.set_field("client.street", &file.client.street)?;
        form.set_field("client.postal_code", &file.client.postal_code)?;
        form.set_field("client.phone", &file.client.phone)?;
        form.set_field("client.tax_id", &file.client.tax_id)?;
        form.set_field("client.city", &file.client.city)?;
        form.set_field("tax_rate", &file.tax_rate)?;

        for (index, line) in file.lines.iter().enumerate() {
            if index > 0 {
                form.add_line_item();
            }
            form.set_field(&format!("lines.{index}.description"), &line.description)?;
            form.set_field(&format!("lines.{index}.amount"), &line.amount)?;
        }

        Ok(form)
    }
}
