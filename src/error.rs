//! Error types for the ATM ledger.

use crate::money::Money;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, AtmError>;

/// Errors returned by the account service and persistence layer.
///
/// Business-rule errors are raised before any mutation. Persistence errors
/// are raised after the in-memory change has been applied.
#[derive(Error, Debug)]
pub enum AtmError {
    /// Malformed or missing input (bad PIN format, mismatched confirmation, empty name)
    #[error("{0}")]
    Validation(String),

    /// No account with this number
    #[error("Account not found: {0}")]
    NotFound(String),

    /// PIN digest did not match the stored digest
    #[error("Invalid PIN")]
    InvalidCredentials,

    /// Account is flagged locked
    #[error("Account is locked: {0}")]
    Locked(String),

    /// Amount was zero or negative
    #[error("Invalid amount {0}: enter amount > 0")]
    InvalidAmount(Money),

    /// Withdrawal exceeds the current balance
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },

    /// Session operation attempted without an authenticated account
    #[error("Login first")]
    NotLoggedIn,

    /// No identifiers left in a sequence (`ACC` or `TX`)
    #[error("No {0} numbers left")]
    SequenceExhausted(&'static str),

    /// Failed to read or write a data file
    #[error("I/O error on {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV reader or writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to write command output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AtmError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AtmError::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for failures to save or load the data files.
    pub fn is_persistence(&self) -> bool {
        matches!(self, AtmError::Persistence { .. })
    }
}
