//! Error types shared across the Digital Order crates

use thiserror::Error;

/// Result type alias using the common Error
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid table number: {table}. Valid tables: {valid:?}")]
    UnknownTable { table: u32, valid: Vec<u32> },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
