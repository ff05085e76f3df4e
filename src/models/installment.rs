//! Installment model
//!
//! A purchase split into equal monthly charges on a credit card. Amounts are
//! divided in whole cents; the cents that do not divide evenly are charged with
//! the first installment so the charges always add up to the purchase total.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::card::CreditCard;
use super::ids::CardId;
use super::money::Money;

/// An installment purchase tied to a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub description: String,

    pub total_amount: Money,

    pub installment_count: u32,

    /// 1-based index of the installment most recently charged
    pub current_installment: u32,

    /// Regular per-month charge (before the first-installment remainder)
    pub installment_value: Money,

    pub purchase_date: NaiveDate,

    /// Card name as written in the snapshot
    pub card_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
}

impl Installment {
    /// Create an installment plan at its first installment
    pub fn new(
        description: impl Into<String>,
        total_amount: Money,
        installment_count: u32,
        card: &CreditCard,
        purchase_date: NaiveDate,
    ) -> Self {
        let (installment_value, _) = total_amount.split(installment_count);
        Self {
            description: description.into(),
            total_amount,
            installment_count,
            current_installment: 1,
            installment_value,
            purchase_date,
            card_name: card.name.clone(),
            card_id: Some(card.id.clone()),
        }
    }

    /// Cents left over by the even split
    pub fn remainder(&self) -> Money {
        self.total_amount - self.installment_value_total()
    }

    fn installment_value_total(&self) -> Money {
        Money::from_cents(self.installment_value.cents() * i64::from(self.installment_count))
    }

    /// Charge for the given 1-based installment number
    pub fn charge_for(&self, number: u32) -> Money {
        if number == 1 {
            self.installment_value + self.remainder()
        } else {
            self.installment_value
        }
    }

    /// Charge for the current installment
    pub fn current_charge(&self) -> Money {
        self.charge_for(self.current_installment)
    }

    /// All installments have been charged
    pub fn is_complete(&self) -> bool {
        self.current_installment >= self.installment_count
    }

    /// Move to the next installment and return its charge
    ///
    /// Returns `None` once the plan is complete.
    pub fn advance(&mut self) -> Option<Money> {
        if self.is_complete() {
            return None;
        }
        self.current_installment += 1;
        Some(self.current_charge())
    }

    /// Amount not yet charged to the card
    pub fn remaining_amount(&self) -> Money {
        ((self.current_installment + 1)..=self.installment_count)
            .map(|n| self.charge_for(n))
            .sum()
    }

    /// Whether this plan charges the given card
    ///
    /// Linked plans match by id; unlinked ones fall back to the card name.
    pub fn belongs_to(&self, card: &CreditCard) -> bool {
        match &self.card_id {
            Some(id) => *id == card.id,
            None => self.card_name == card.name,
        }
    }
}

impl fmt::Display for Installment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} x {} ({})",
            self.description,
            self.current_installment,
            self.installment_count,
            self.installment_value,
            self.card_name
        )
    }
}
