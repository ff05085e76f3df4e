//! Custom error types for wallet-ledger
//!
//! Every business-rule rejection (bad amount, bad index, duplicate, insufficient
//! funds) is a variant here, so callers get a typed "declined" signal instead of a
//! panic.

use thiserror::Error;

use crate::models::{AmountOverflow, Money};

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for inputs and models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors (includes out-of-range indexes)
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Not enough money in the wallet
    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Money, available: Money },

    /// Card limit would be exceeded (only when limit enforcement is on)
    #[error("Card '{card}' limit exceeded: limit {limit}, requested {requested}")]
    LimitExceeded {
        card: String,
        limit: Money,
        requested: Money,
    },

    /// Operation not allowed on a reserved entity
    #[error("'{0}' is reserved and cannot be changed")]
    Reserved(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(index: usize) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: format!("#{}", index),
        }
    }

    /// Create a "not found" error for banks
    pub fn bank_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Bank",
            identifier: name.into(),
        }
    }

    /// Create a "not found" error for cards addressed by index
    pub fn card_not_found(index: usize) -> Self {
        Self::NotFound {
            entity_type: "Card",
            identifier: format!("#{}", index),
        }
    }

    /// Create a "not found" error for cards addressed by name
    pub fn card_name_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Card",
            identifier: name.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(month: impl std::fmt::Display, index: usize) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: format!("{} #{}", month, index),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the wallet could not cover the operation
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, Self::InsufficientFunds { .. })
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<AmountOverflow> for LedgerError {
    fn from(err: AmountOverflow) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
