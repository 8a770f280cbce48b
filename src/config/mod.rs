mod settings;

pub use settings::{Company, Config, PdfSettings};

use crate::error::{FacturaError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.factura/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "factura") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.factura/
    let home = dirs_home().ok_or_else(|| {
        FacturaError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".factura"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs_home() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(FacturaError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| FacturaError::ConfigParse { path, source: e })
}

/// Resolve the PDF output directory: ~ expansion for absolute-ish paths,
/// otherwise relative to the config directory.
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let expanded = expand_path(output_dir);
    if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    }
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"# Issuer details printed in the "DATOS DE LA EMPRESA" table.
[company]
name = "Nombre Empresa"
street = "Calle Ejemplo 1"
postal_code = "28001"
tax_id = "00000000X"

[pdf]
output_dir = "~/.factura/output"
# Layout constants in mm; the defaults match the stock layout.
# margin = 15.0
# inter_table_gap = 10.0
# row_height = 8.0
"#;

/// Template content for an example form file (factura.toml)
pub const FORM_TEMPLATE: &str = r#"# One invoice per file. Amounts are decimal strings; anything that does not
# parse counts as zero in the totals.
tax_rate = "21"

[client]
name = "Cliente Ejemplo"
street = "C/ Mayor 1"
postal_code = "28001"
phone = "600123456"
tax_id = "B12345678"
city = "Madrid"

[[lines]]
description = "Mano de obra"
amount = "100.00"

[[lines]]
description = "Materiales"
amount = "50.00"
"#;
