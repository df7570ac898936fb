//! Digital Order common library
//!
//! Table lookup, API configuration, and the wire types shared by the
//! session client and the CLI.

pub mod config;
pub mod error;
pub mod tables;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, Credentials, TenderConfig, VenueConfig};
pub use error::{Error, Result};
pub use tables::{
    get_all_table_numbers, get_table_id, get_table_url, table_url, TableIdentity,
    DEFAULT_TABLE_NUMBER, FRONTEND_BASE_URL,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default config directory
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".dorder")
}

/// Default config file path
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
