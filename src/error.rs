use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not parse TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("could not write TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("language pack '{language}' is invalid: {reason}")]
    InvalidPack { language: String, reason: String },

    #[error("unsupported export version: {found} (expected {expected})")]
    UnsupportedExportVersion { found: u32, expected: u32 },
}
