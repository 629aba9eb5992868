use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Expected exactly one Info.dat file, found {found}")]
    MissingInfoFile { found: usize },

    #[error("Bundle files {first} and {second} differ only in case")]
    FileNameCollision { first: String, second: String },

    #[error("Difficulty file referenced but not present in bundle: {0}")]
    DanglingReference(String),

    #[error("Unsupported schema generation: {0}")]
    UnsupportedGeneration(String),

    #[error("Source is neither a directory nor a ZIP archive: {0}")]
    InvalidSource(PathBuf),

    #[error("Invalid difficulty rank: {0}")]
    InvalidDifficultyRank(String),

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl Error {
    pub(crate) fn missing_field(field: &str) -> Self {
        Error::MalformedDocument(format!("missing or mistyped field '{}'", field))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
