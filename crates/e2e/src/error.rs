//! Error types for the check lifecycle

use thiserror::Error;

/// Failures raised by the order session client
///
/// Each variant names the lifecycle step that failed, so setup failures
/// (fatal to a test) can be told apart from read and close failures (logged
/// during teardown).
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Setup failed for table {table}: {reason}")]
    Setup { table: u32, reason: String },

    #[error("Fetching check details failed: {0}")]
    Fetch(String),

    #[error("Closing check failed: {0}")]
    Close(String),

    #[error("Adding items failed: {0}")]
    AddItems(String),

    #[error("Fetching menu failed: {0}")]
    Menu(String),

    #[error("No order session is bound; open a table fixture first")]
    NotInitialized,

    #[error(transparent)]
    Config(#[from] dorder_common::Error),
}

pub type OrderResult<T> = Result<T, OrderError>;

/// Failures of a single HTTP exchange, before they are attributed to a
/// lifecycle step
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
