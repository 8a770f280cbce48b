use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub company: Company,
    pub pdf: PdfSettings,
}

/// Issuer details printed in the "DATOS DE LA EMPRESA" table.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Company {
    pub name: String,
    pub street: String,
    pub postal_code: String,
    pub tax_id: String,
}

impl Company {
    /// The issuer rows in display order.
    pub fn rows(&self) -> Vec<String> {
        vec![
            format!("Nombre Empresa: {}", self.name),
            format!("C/ {}", self.street),
            format!("C. Postal: {}", self.postal_code),
            format!("DNI: {}", self.tax_id),
        ]
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PdfSettings {
    pub output_dir: String,
    /// Page margin in mm.
    #[serde(default = "default_margin")]
    pub margin: f32,
    /// Vertical gap between stacked tables in mm.
    #[serde(default = "default_gap")]
    pub inter_table_gap: f32,
    /// Table row height in mm.
    #[serde(default = "default_row_height")]
    pub row_height: f32,
}

fn default_margin() -> f32 {
    15.0
}

fn default_gap() -> f32 {
    10.0
}

fn default_row_height() -> f32 {
    8.0
}
