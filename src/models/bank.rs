//! Bank model
//!
//! A bank is a named sub-account of the wallet.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// The catch-all bank. Always present, never deleted.
pub const GENERAL_BANK: &str = "Geral";

/// A named sub-account holding part of the wallet balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub name: String,

    #[serde(default)]
    pub balance: Money,
}

impl Bank {
    /// Create a bank with a zero balance
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            balance: Money::zero(),
        }
    }

    /// The reserved "Geral" bank
    pub fn general() -> Self {
        Self::new(GENERAL_BANK)
    }

    pub fn is_general(&self) -> bool {
        is_general(&self.name)
    }
}

/// Whether a bank name refers to the reserved catch-all bank
pub fn is_general(name: &str) -> bool {
    name == GENERAL_BANK
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.balance)
    }
}
