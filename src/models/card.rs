//! Credit card model
//!
//! A card tracks its limit and outstanding usage. The outstanding balance is
//! mirrored into the monthly expenses as an invoice named "Invoice {card name}".

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CardId;
use super::money::{AmountOverflow, Money};

/// Description prefix of invoice mirror expenses
pub const INVOICE_PREFIX: &str = "Invoice ";

/// Invoice prefix written by older snapshots
pub const LEGACY_INVOICE_PREFIX: &str = "Fatura ";

/// Expense description used for a card's invoice
pub fn invoice_description(card_name: &str) -> String {
    format!("{}{}", INVOICE_PREFIX, card_name)
}

/// Whether a description names a card invoice
pub fn is_invoice_description(description: &str) -> bool {
    description.starts_with(INVOICE_PREFIX)
}

/// Card name referenced by an invoice description
pub fn invoice_card_name(description: &str) -> Option<&str> {
    description.strip_prefix(INVOICE_PREFIX)
}

/// A credit card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: CardId,

    pub name: String,

    pub limit: Money,

    /// Outstanding balance on the card
    pub used: Money,

    /// Day of month the invoice is due (free text, e.g. "10")
    #[serde(alias = "due_date")]
    pub due_day: String,

    /// Last explicitly set "available" figure, display only
    pub override_available: Money,
}

impl CreditCard {
    /// Create a new card with nothing used
    pub fn new(name: impl Into<String>, limit: Money, due_day: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            name: name.into(),
            limit,
            used: Money::zero(),
            due_day: due_day.into(),
            override_available: limit,
        }
    }

    /// `limit - used`
    pub fn calculated_available(&self) -> Money {
        self.limit - self.used
    }

    pub fn invoice_description(&self) -> String {
        invoice_description(&self.name)
    }

    /// Add a charge to the outstanding balance
    pub fn charge(&mut self, amount: Money) -> Result<(), AmountOverflow> {
        self.used = self.used.checked_add(amount)?;
        Ok(())
    }

    /// Mark the card as fully paid
    pub fn clear_usage(&mut self) {
        self.used = Money::zero();
        self.override_available = self.limit;
    }

    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.name.trim().is_empty() {
            return Err(CardValidationError::EmptyName);
        }
        if self.limit.is_negative() {
            return Err(CardValidationError::NegativeLimit(self.limit));
        }
        if self.used.is_negative() {
            return Err(CardValidationError::NegativeUsage(self.used));
        }
        Ok(())
    }
}

impl fmt::Display for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} / {})", self.name, self.used, self.limit)
    }
}

/// Validation errors for cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    EmptyName,
    NegativeLimit(Money),
    NegativeUsage(Money),
}

impl fmt::Display for CardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Card name cannot be empty"),
            Self::NegativeLimit(limit) => write!(f, "Card limit cannot be negative ({})", limit),
            Self::NegativeUsage(used) => write!(f, "Card usage cannot be negative ({})", used),
        }
    }
}

impl std::error::Error for CardValidationError {}
