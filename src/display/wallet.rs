//! Wallet display formatting
//!
//! Formats the transaction history and bank balances.

use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::models::transaction::timestamp;
use crate::models::{Transaction, TransactionKind, Wallet};

use super::{column_width, truncate};

/// Format the transaction history as a numbered register
///
/// Row numbers are the indexes accepted by the edit and delete commands;
/// `first_index` is the index of `history[0]` when showing a tail.
pub fn format_history(
    history: &[Transaction],
    first_index: usize,
    symbol: &str,
    timestamp_format: &str,
) -> String {
    if history.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let bank_width = column_width(history.iter().map(|t| t.bank.as_str()), "Bank").min(16);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:16}  {:7}  {:<bank_width$}  {:30}  {:>14}\n",
        "#",
        "Date",
        "Type",
        "Bank",
        "Description",
        "Amount",
        bank_width = bank_width,
    ));
    output.push_str(&"-".repeat(4 + 16 + 7 + bank_width + 30 + 14 + 10));
    output.push('\n');

    for (index, txn) in history.iter().enumerate() {
        let kind = match txn.kind {
            TransactionKind::Income => "in",
            TransactionKind::Outflow => "out",
        };
        output.push_str(&format!(
            "{:>4}  {:16}  {:7}  {:<bank_width$}  {:30}  {:>14}\n",
            first_index + index,
            format_timestamp(&txn.date, timestamp_format),
            kind,
            truncate(&txn.bank, bank_width),
            truncate(&txn.description, 30),
            txn.signed_amount().format_with_symbol(symbol),
            bank_width = bank_width,
        ));
    }

    output
}

/// Render a timestamp, falling back to the on-disk format when `format` is invalid
fn format_timestamp(date: &NaiveDateTime, format: &str) -> String {
    let mut rendered = String::new();
    if write!(rendered, "{}", date.format(format)).is_err() {
        return date.format(timestamp::FORMAT).to_string();
    }
    rendered
}

/// Format bank balances with the bank sum and the wallet total underneath
///
/// The two totals differ by the outflows charged to "Geral", which only
/// debit the wallet.
pub fn format_bank_list(wallet: &Wallet, symbol: &str) -> String {
    let banks = &wallet.banks;
    let name_width = column_width(banks.iter().map(|b| b.name.as_str()), "Bank");

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>14}\n",
        "Bank",
        "Balance",
        name_width = name_width
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->14}\n",
        "",
        "",
        name_width = name_width
    ));

    for bank in banks {
        output.push_str(&format!(
            "{:<name_width$}  {:>14}\n",
            bank.name,
            bank.balance.format_with_symbol(symbol),
            name_width = name_width
        ));
    }

    output.push_str(&format!(
        "{:-<name_width$}  {:->14}\n",
        "",
        "",
        name_width = name_width
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:>14}\n",
        "BANKS",
        wallet.bank_total().format_with_symbol(symbol),
        name_width = name_width
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:>14}\n",
        "WALLET",
        wallet.balance.format_with_symbol(symbol),
        name_width = name_width
    ));

    output
}
