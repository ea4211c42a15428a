use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Restaurant not found: {0}")]
    NotFound(String),

    #[error("Invalid label for {field}: {value}")]
    InvalidLabel { field: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed catalog file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Upload is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("Upload is not a list of restaurant records: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Upload must be a JSON array of objects")]
    NotAList,

    #[error("Upload is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
