//! Card service
//!
//! Credit card lifecycle plus the invoice mirror: a card's outstanding usage is
//! reflected as an "Invoice {name}" expense in the month it was charged, and
//! paying the card clears that mirror from every month.

use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::{
    CardId, CreditCard, LedgerState, Money, MonthKey, Transaction, TransactionKind, GENERAL_BANK,
};

use super::wallet::commit_outflow;

/// Service for credit card operations
pub struct CardService<'a> {
    ledger: &'a mut Ledger,
}

/// Sums over every card, for summary views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardTotals {
    pub limit: Money,
    pub used: Money,
    pub available: Money,
}

/// Card fields to change; `None` leaves a field as it is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardEdit {
    pub limit: Option<Money>,
    pub due_day: Option<String>,
    pub override_available: Option<Money>,
}

impl CardEdit {
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.due_day.is_none() && self.override_available.is_none()
    }
}

impl<'a> CardService<'a> {
    /// Create a new card service
    pub fn new(ledger: &'a mut Ledger) -> Self {
        Self { ledger }
    }

    /// Create a card with nothing used
    pub fn add_card(
        &mut self,
        name: &str,
        limit: Money,
        due_day: &str,
    ) -> LedgerResult<CreditCard> {
        let card = CreditCard::new(name.trim(), limit, due_day.trim());
        card.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.ledger.transact("add_card", |state| {
            state.cards.push(card.clone());
            info!(card = %card.name, id = %card.id, "card added");
            Ok(card)
        })
    }

    /// Overwrite the card's outstanding usage
    ///
    /// Only an increase is mirrored into the month's invoice; lowering the
    /// usage leaves an existing invoice as it was.
    pub fn set_used(&mut self, index: usize, used: Money, month: MonthKey) -> LedgerResult<()> {
        if used.is_negative() {
            return Err(LedgerError::Validation(format!(
                "Card usage cannot be negative ({})",
                used
            )));
        }
        let enforce_limit = self.ledger.settings().enforce_card_limit;

        self.ledger.transact("set_used", |state| {
            let card = card_at_mut(state, index)?;
            if enforce_limit && used > card.limit {
                return Err(LedgerError::LimitExceeded {
                    card: card.name.clone(),
                    limit: card.limit,
                    requested: used,
                });
            }

            let previous = card.used;
            card.used = used;
            let id = card.id.clone();

            if used > previous && used.is_positive() {
                sync_invoice(state, &id, month);
            }
            Ok(())
        })
    }

    /// Upsert the card's invoice in the given month
    pub fn sync_invoice(&mut self, index: usize, month: MonthKey) -> LedgerResult<()> {
        self.ledger.transact("sync_invoice", |state| {
            let id = card_at(state, index)?.id.clone();
            sync_invoice(state, &id, month);
            Ok(())
        })
    }

    /// Pay the card's outstanding usage from the wallet
    ///
    /// Returns the amount paid; zero when nothing was owed, in which case the
    /// ledger is not touched.
    pub fn pay_invoice(&mut self, index: usize) -> LedgerResult<Money> {
        let card = self.card(index)?;
        if card.used.is_zero() {
            return Ok(Money::zero());
        }
        let now = self.ledger.clock().now();

        self.ledger.transact("pay_invoice", |state| {
            let card = card_at_mut(state, index)?;
            let amount = card.used;
            let txn = Transaction::at(
                now,
                TransactionKind::Outflow,
                amount,
                card.invoice_description(),
                GENERAL_BANK,
            );
            card.clear_usage();
            let card = card.clone();

            commit_outflow(&mut state.wallet, txn)?;
            let removed = state.expenses.remove_invoices(&card);

            info!(card = %card.name, %amount, removed, "invoice paid");
            Ok(amount)
        })
    }

    pub fn set_limit(&mut self, index: usize, limit: Money) -> LedgerResult<()> {
        let edit = CardEdit {
            limit: Some(limit),
            ..CardEdit::default()
        };
        self.apply_edit("set_limit", index, edit)
    }

    pub fn set_due_day(&mut self, index: usize, due_day: &str) -> LedgerResult<()> {
        let edit = CardEdit {
            due_day: Some(due_day.to_string()),
            ..CardEdit::default()
        };
        self.apply_edit("set_due_day", index, edit)
    }

    /// Set the displayed "available" figure without touching the real usage
    pub fn set_override_available(&mut self, index: usize, value: Money) -> LedgerResult<()> {
        let edit = CardEdit {
            override_available: Some(value),
            ..CardEdit::default()
        };
        self.apply_edit("set_override_available", index, edit)
    }

    /// Change several card fields at once; either all of them change or none
    pub fn edit(&mut self, index: usize, edit: CardEdit) -> LedgerResult<()> {
        self.apply_edit("edit_card", index, edit)
    }

    fn apply_edit(&mut self, op_name: &str, index: usize, edit: CardEdit) -> LedgerResult<()> {
        if let Some(limit) = edit.limit {
            if !limit.is_positive() {
                return Err(LedgerError::Validation(format!(
                    "Card limit must be greater than zero (got {})",
                    limit
                )));
            }
        }
        let due_day = match edit.due_day.as_deref().map(str::trim) {
            Some("") => {
                return Err(LedgerError::Validation("Due day cannot be empty".into()));
            }
            other => other.map(str::to_string),
        };
        let enforce_limit = self.ledger.settings().enforce_card_limit;

        self.ledger.transact(op_name, |state| {
            let card = card_at_mut(state, index)?;
            if let Some(limit) = edit.limit {
                if enforce_limit && card.used > limit {
                    return Err(LedgerError::LimitExceeded {
                        card: card.name.clone(),
                        limit,
                        requested: card.used,
                    });
                }
                card.limit = limit;
            }
            if let Some(due_day) = due_day {
                card.due_day = due_day;
            }
            if let Some(value) = edit.override_available {
                card.override_available = value;
            }
            Ok(())
        })
    }

    /// Remove a card and its invoices in every month
    ///
    /// Installment plans on the card are kept; their later charges are skipped.
    pub fn delete_card(&mut self, index: usize) -> LedgerResult<CreditCard> {
        self.ledger.transact("delete_card", |state| {
            let card = card_at(state, index)?.clone();
            let removed = state.expenses.remove_invoices(&card);
            state.cards.remove(index);

            info!(card = %card.name, removed, "card deleted");
            Ok(card)
        })
    }

    pub fn cards(&self) -> &[CreditCard] {
        &self.ledger.state().cards
    }

    pub fn card(&self, index: usize) -> LedgerResult<&CreditCard> {
        card_at(self.ledger.state(), index)
    }

    /// `limit - used` for the card
    pub fn available(&self, index: usize) -> LedgerResult<Money> {
        Ok(self.card(index)?.calculated_available())
    }

    pub fn totals(&self) -> CardTotals {
        self.cards()
            .iter()
            .fold(CardTotals::default(), |mut acc, card| {
                acc.limit += card.limit;
                acc.used += card.used;
                acc.available += card.calculated_available();
                acc
            })
    }
}

fn card_at(state: &LedgerState, index: usize) -> LedgerResult<&CreditCard> {
    state
        .cards
        .get(index)
        .ok_or_else(|| LedgerError::card_not_found(index))
}

fn card_at_mut(state: &mut LedgerState, index: usize) -> LedgerResult<&mut CreditCard> {
    state
        .cards
        .get_mut(index)
        .ok_or_else(|| LedgerError::card_not_found(index))
}

/// Mirror the card's current usage into its invoice for `month`
///
/// Does nothing if the card no longer exists.
pub(crate) fn sync_invoice(state: &mut LedgerState, card_id: &CardId, month: MonthKey) {
    let Some(card) = state.card_by_id(card_id).cloned() else {
        return;
    };
    let created = state.expenses.upsert_invoice(&card, month);
    debug!(card = %card.name, %month, used = %card.used, created, "invoice synced");
}
