//! Transaction model
//!
//! Wallet history entries. Amounts are always positive; the direction lives in
//! `TransactionKind`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::bank::GENERAL_BANK;
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming into the wallet
    #[serde(alias = "Entrada", alias = "entrada")]
    Income,
    /// Money leaving the wallet
    #[serde(alias = "Saída", alias = "Saida", alias = "saída", alias = "saida")]
    Outflow,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Outflow => write!(f, "Outflow"),
        }
    }
}

/// A wallet transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// When the transaction was recorded
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Always positive
    pub amount: Money,

    #[serde(default)]
    pub description: String,

    /// Bank the money moved through
    #[serde(default = "default_bank")]
    pub bank: String,
}

fn default_bank() -> String {
    GENERAL_BANK.to_string()
}

impl Transaction {
    /// Create a transaction with an explicit timestamp
    pub fn at(
        date: NaiveDateTime,
        kind: TransactionKind,
        amount: Money,
        description: impl Into<String>,
        bank: impl Into<String>,
    ) -> Self {
        Self {
            date: timestamp::truncate(date),
            kind,
            amount,
            description: description.into(),
            bank: bank.into(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_outflow(&self) -> bool {
        self.kind == TransactionKind::Outflow
    }

    /// Effect on the wallet total: positive for income, negative for outflow
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Outflow => -self.amount,
        }
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        if self.bank.trim().is_empty() {
            return Err(TransactionValidationError::EmptyBank);
        }
        Ok(())
    }
}

#[cfg(test)]
impl Transaction {
    fn stamped(
        kind: TransactionKind,
        amount: Money,
        description: impl Into<String>,
        bank: impl Into<String>,
    ) -> Self {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 15)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap();
        Self::at(date, kind, amount, description, bank)
    }

    pub(crate) fn income(
        amount: Money,
        description: impl Into<String>,
        bank: impl Into<String>,
    ) -> Self {
        Self::stamped(TransactionKind::Income, amount, description, bank)
    }

    pub(crate) fn outflow(
        amount: Money,
        description: impl Into<String>,
        bank: impl Into<String>,
    ) -> Self {
        Self::stamped(TransactionKind::Outflow, amount, description, bank)
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    EmptyBank,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::EmptyBank => write!(f, "Bank name cannot be empty"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

/// On-disk timestamp format for transactions
///
/// Written as "dd/mm/YYYY HH:MM"; ISO-8601 strings are accepted on load.
pub mod timestamp {
    use chrono::{NaiveDateTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d/%m/%Y %H:%M";

    const ACCEPTED: &[&str] = &[
        FORMAT,
        "%d/%m/%Y %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    /// Drop seconds so in-memory values match what a save/load cycle yields
    pub fn truncate(date: NaiveDateTime) -> NaiveDateTime {
        date.with_second(0)
            .and_then(|d| d.with_nanosecond(0))
            .unwrap_or(date)
    }

    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        ACCEPTED
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    }

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s)))
    }
}
