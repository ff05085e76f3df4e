//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod bank;
pub mod card;
pub mod expense;
pub mod installment;
pub mod wallet;

pub use bank::{handle_bank_command, BankCommands};
pub use card::{handle_card_command, CardCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use installment::{handle_installment_command, InstallmentCommands};
pub use wallet::{handle_wallet_command, WalletCommands};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, MonthKey};

/// Parse a user-entered amount such as "1500", "45.90" or "R$ 45,90"
pub(crate) fn parse_amount(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '1500' or '45.90'. Error: {}",
            input, e
        ))
    })
}

/// Parse an optional "YYYY-MM" argument, defaulting to `current`
pub(crate) fn parse_month(input: Option<&str>, current: MonthKey) -> LedgerResult<MonthKey> {
    match input {
        Some(s) => MonthKey::parse(s).map_err(|e| {
            LedgerError::Validation(format!("Invalid month: '{}'. Use YYYY-MM. Error: {}", s, e))
        }),
        None => Ok(current),
    }
}
