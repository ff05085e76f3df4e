//! Installment service
//!
//! A parcelled purchase charges its first installment onto the card right away;
//! each month rollover charges the next one until the plan is complete.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::{CardId, Installment, LedgerState, Money, MonthKey};

use super::card::sync_invoice;

/// Service for installment plans
pub struct InstallmentService<'a> {
    ledger: &'a mut Ledger,
}

/// Input for registering a parcelled purchase
#[derive(Debug, Clone)]
pub struct NewInstallment {
    pub description: String,
    pub total_amount: Money,
    pub installment_count: u32,
    pub card_name: String,
    /// Defaults to today
    pub purchase_date: Option<NaiveDate>,
}

/// What a month rollover did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RollSummary {
    /// False when the requested month was not the current one
    pub ran: bool,
    /// Plans moved to their next installment
    pub advanced: usize,
    /// Finished plans removed from tracking
    pub completed: usize,
    /// Plans whose card no longer exists; advanced without a charge
    pub orphaned: usize,
}

impl<'a> InstallmentService<'a> {
    /// Create a new installment service
    pub fn new(ledger: &'a mut Ledger) -> Self {
        Self { ledger }
    }

    /// Register a purchase and charge its first installment
    pub fn add_installment(&mut self, input: NewInstallment) -> LedgerResult<Installment> {
        let description = input.description.trim();
        if description.is_empty() {
            return Err(LedgerError::Validation(
                "Installment description cannot be empty".into(),
            ));
        }
        if !input.total_amount.is_positive() {
            return Err(LedgerError::Validation(format!(
                "Total amount must be greater than zero (got {})",
                input.total_amount
            )));
        }
        if input.installment_count == 0 {
            return Err(LedgerError::Validation(
                "Installment count must be at least 1".into(),
            ));
        }

        let purchase_date = input
            .purchase_date
            .unwrap_or_else(|| self.ledger.clock().today());
        let month = self.ledger.current_month();
        let enforce_limit = self.ledger.settings().enforce_card_limit;

        self.ledger.transact("add_installment", |state| {
            let card = state
                .card_by_name_mut(&input.card_name)
                .ok_or_else(|| LedgerError::card_name_not_found(&input.card_name))?;

            let plan = Installment::new(
                description,
                input.total_amount,
                input.installment_count,
                card,
                purchase_date,
            );
            let charge = plan.current_charge();
            let requested = card.used.checked_add(charge)?;

            if enforce_limit && requested > card.limit {
                return Err(LedgerError::LimitExceeded {
                    card: card.name.clone(),
                    limit: card.limit,
                    requested,
                });
            }
            card.charge(charge)?;
            let card_id = card.id.clone();

            sync_invoice(state, &card_id, month);
            state.installments.push(plan.clone());

            info!(
                description = %plan.description,
                card = %plan.card_name,
                count = plan.installment_count,
                %charge,
                "installment added"
            );
            Ok(plan)
        })
    }

    /// Advance every plan by one installment
    ///
    /// Only runs for the current calendar month; any other month is a no-op.
    pub fn roll_month(&mut self, month: MonthKey) -> LedgerResult<RollSummary> {
        let current = self.ledger.current_month();
        if month != current {
            info!(%month, %current, "roll skipped, not the current month");
            return Ok(RollSummary::default());
        }

        let summary = self.ledger.transact("roll_month", |state| {
            let mut summary = RollSummary {
                ran: true,
                ..RollSummary::default()
            };

            let plans = std::mem::take(&mut state.installments);
            for mut plan in plans {
                let Some(charge) = plan.advance() else {
                    summary.completed += 1;
                    continue;
                };

                match owning_card(state, &plan) {
                    Some(card_id) => {
                        if let Some(card) = state.card_by_id_mut(&card_id) {
                            card.charge(charge)?;
                        }
                        sync_invoice(state, &card_id, month);
                        summary.advanced += 1;
                    }
                    None => {
                        warn!(
                            description = %plan.description,
                            card = %plan.card_name,
                            "card missing, installment not charged"
                        );
                        summary.orphaned += 1;
                    }
                }
                state.installments.push(plan);
            }
            Ok(summary)
        })?;

        info!(
            %month,
            advanced = summary.advanced,
            completed = summary.completed,
            orphaned = summary.orphaned,
            "month rolled"
        );
        Ok(summary)
    }

    pub fn installments(&self) -> &[Installment] {
        &self.ledger.state().installments
    }

    /// Amount still to be charged for a plan
    pub fn remaining_amount(&self, index: usize) -> LedgerResult<Money> {
        self.installments()
            .get(index)
            .map(Installment::remaining_amount)
            .ok_or_else(|| LedgerError::NotFound {
                entity_type: "Installment",
                identifier: format!("#{}", index),
            })
    }
}

fn owning_card(state: &LedgerState, plan: &Installment) -> Option<CardId> {
    state
        .cards
        .iter()
        .find(|c| plan.belongs_to(c))
        .map(|c| c.id.clone())
}
