use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for registry, ledger, and storage operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("No ledger loaded")]
    LedgerNotLoaded,
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Record not found: {0}")]
    RecordNotFound(String),
    #[error("Movement not found: {0}")]
    MovementNotFound(String),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}
