use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FacturaError {
    #[error("Config directory not found at {0}. Run 'factura init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Form file not found: {0}")]
    FormFileNotFound(PathBuf),

    #[error("Failed to parse form file {path}: {source}")]
    FormParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown form field '{0}'")]
    UnknownField(String),

    #[error("Line item index {0} is out of range")]
    LineItemIndex(usize),

    #[error("Form is not valid ({0} field error(s))")]
    FormInvalid(usize),

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),
}

pub type Result<T> = std::result::Result<T, FacturaError>;
