//! Monthly expense model
//!
//! Expenses are grouped per month. A card's outstanding balance shows up here
//! as an invoice expense that is kept in sync by the card ledger.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::card::{is_invoice_description, CreditCard};
use super::ids::CardId;
use super::money::{AmountOverflow, Money};
use super::month::MonthKey;

/// A single expense within a month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyExpense {
    /// Natural key within a month
    pub description: String,

    pub amount: Money,

    #[serde(default, alias = "due_date")]
    pub due_day: String,

    #[serde(default)]
    pub paid: bool,

    #[serde(default)]
    pub recurring: bool,

    /// Last month a recurring expense was spread to
    #[serde(default, alias = "recurrence_end_month")]
    pub recurrence_end: Option<MonthKey>,

    /// Owning card when this expense mirrors a card invoice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
}

impl MonthlyExpense {
    /// Create an unpaid, non-recurring expense
    pub fn new(description: impl Into<String>, amount: Money, due_day: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount,
            due_day: due_day.into(),
            paid: false,
            recurring: false,
            recurrence_end: None,
            card_id: None,
        }
    }

    /// Create the unpaid invoice mirror of a card
    pub fn invoice(card: &CreditCard) -> Self {
        Self {
            card_id: Some(card.id.clone()),
            ..Self::new(card.invoice_description(), card.used, card.due_day.clone())
        }
    }

    /// Whether this expense is a card invoice
    pub fn is_invoice(&self) -> bool {
        self.card_id.is_some() || is_invoice_description(&self.description)
    }

    /// Whether this expense is the invoice of the given card
    ///
    /// Linked invoices match by id; unlinked ones fall back to the name.
    pub fn is_invoice_of(&self, card: &CreditCard) -> bool {
        match &self.card_id {
            Some(id) => *id == card.id,
            None => self.description == card.invoice_description(),
        }
    }
}

impl fmt::Display for MonthlyExpense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.paid { "paid" } else { "unpaid" };
        write!(f, "{} {} ({})", self.description, self.amount, status)
    }
}

/// Paid/pending breakdown of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthSummary {
    pub total: Money,
    pub paid: Money,
    pub pending: Money,
    pub count: usize,
}

/// Expense lists keyed by month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExpenseBook {
    months: BTreeMap<MonthKey, Vec<MonthlyExpense>>,
}

impl ExpenseBook {
    pub fn from_months(months: BTreeMap<MonthKey, Vec<MonthlyExpense>>) -> Self {
        Self { months }
    }

    /// Read-only view of a month; empty if the month has never been touched
    pub fn month(&self, month: MonthKey) -> &[MonthlyExpense] {
        self.months.get(&month).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_month(&self, month: MonthKey) -> bool {
        self.months.contains_key(&month)
    }

    /// Get a month's list, creating an empty one first if needed
    pub fn month_mut(&mut self, month: MonthKey) -> &mut Vec<MonthlyExpense> {
        self.months.entry(month).or_default()
    }

    /// Indexed expense in an existing month
    pub fn get(&self, month: MonthKey, index: usize) -> Option<&MonthlyExpense> {
        self.months.get(&month)?.get(index)
    }

    pub fn get_mut(&mut self, month: MonthKey, index: usize) -> Option<&mut MonthlyExpense> {
        self.months.get_mut(&month)?.get_mut(index)
    }

    /// Remove an expense from an existing month
    pub fn remove(&mut self, month: MonthKey, index: usize) -> Option<MonthlyExpense> {
        let list = self.months.get_mut(&month)?;
        (index < list.len()).then(|| list.remove(index))
    }

    /// Whether a month already holds an expense with this description
    pub fn has_description(&self, month: MonthKey, description: &str) -> bool {
        self.month(month).iter().any(|e| e.description == description)
    }

    /// All month keys in chronological order
    pub fn months(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.months.keys().copied()
    }

    /// Iterate over every (month, expense) pair
    pub fn iter(&self) -> impl Iterator<Item = (MonthKey, &MonthlyExpense)> {
        self.months
            .iter()
            .flat_map(|(month, list)| list.iter().map(move |e| (*month, e)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MonthlyExpense> {
        self.months.values_mut().flat_map(|list| list.iter_mut())
    }

    /// Create or refresh a card's invoice in the given month
    ///
    /// Returns true when a new invoice entry was created.
    pub fn upsert_invoice(&mut self, card: &CreditCard, month: MonthKey) -> bool {
        let list = self.month_mut(month);
        match list.iter().position(|e| e.is_invoice_of(card)) {
            Some(index) => {
                let existing = &mut list[index];
                existing.amount = card.used;
                existing.due_day = card.due_day.clone();
                existing.card_id = Some(card.id.clone());
                false
            }
            None => {
                list.push(MonthlyExpense::invoice(card));
                true
            }
        }
    }

    /// Drop a card's invoice from every month; returns how many were removed
    pub fn remove_invoices(&mut self, card: &CreditCard) -> usize {
        let mut removed = 0;
        for list in self.months.values_mut() {
            let before = list.len();
            list.retain(|e| !e.is_invoice_of(card));
            removed += before - list.len();
        }
        removed
    }

    /// Sum of every expense in a month, paid or not
    pub fn total(&self, month: MonthKey) -> Money {
        self.month(month).iter().map(|e| e.amount).sum()
    }

    /// Exact month total; fails where `total` would saturate
    pub fn checked_total(&self, month: MonthKey) -> Result<Money, AmountOverflow> {
        self.month(month)
            .iter()
            .try_fold(Money::zero(), |acc, e| acc.checked_add(e.amount))
    }

    pub fn summary(&self, month: MonthKey) -> MonthSummary {
        self.month(month)
            .iter()
            .fold(MonthSummary::default(), |mut acc, e| {
                acc.total += e.amount;
                if e.paid {
                    acc.paid += e.amount;
                } else {
                    acc.pending += e.amount;
                }
                acc.count += 1;
                acc
            })
    }
}
