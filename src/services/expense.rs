//! Expense service
//!
//! Per-month expense lists. Paying an ordinary expense debits the wallet;
//! paying a card invoice clears the card instead.

use tracing::{debug, info, warn};

use crate::config::MAX_RECURRENCE_HORIZON_MONTHS;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::card::{invoice_card_name, is_invoice_description};
use crate::models::{
    LedgerState, Money, MonthKey, MonthSummary, MonthlyExpense, Transaction, TransactionKind,
    GENERAL_BANK,
};

use super::wallet::commit_outflow;

/// Service for monthly expenses
pub struct ExpenseService<'a> {
    ledger: &'a mut Ledger,
}

/// Input for adding an expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub month: MonthKey,
    pub description: String,
    pub amount: Money,
    pub due_day: String,
    pub recurring: bool,
    /// Last month of the recurrence; defaults to the configured horizon
    pub recurrence_end: Option<MonthKey>,
}

impl NewExpense {
    /// One-off expense in a month
    pub fn once(
        month: MonthKey,
        description: impl Into<String>,
        amount: Money,
        due_day: impl Into<String>,
    ) -> Self {
        Self {
            month,
            description: description.into(),
            amount,
            due_day: due_day.into(),
            recurring: false,
            recurrence_end: None,
        }
    }

    /// Make the expense repeat until `end` (or the default horizon)
    pub fn recurring(mut self, end: Option<MonthKey>) -> Self {
        self.recurring = true;
        self.recurrence_end = end;
        self
    }
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(ledger: &'a mut Ledger) -> Self {
        Self { ledger }
    }

    /// Expenses of a month; empty if the month has no list
    pub fn month_expenses(&self, month: MonthKey) -> &[MonthlyExpense] {
        self.ledger.state().expenses.month(month)
    }

    /// Expenses of a month, creating and persisting an empty list if needed
    pub fn get_or_create_month(&mut self, month: MonthKey) -> LedgerResult<&[MonthlyExpense]> {
        if !self.ledger.state().expenses.contains_month(month) {
            self.ledger.transact("get_or_create_month", |state| {
                state.expenses.month_mut(month);
                Ok(())
            })?;
            debug!(%month, "month created");
        }
        Ok(self.month_expenses(month))
    }

    /// Add an expense, spreading it over later months when recurring
    ///
    /// Returns the months the expense was written to. Invoice-style names skip
    /// the duplicate check in the starting month.
    pub fn add_expense(&mut self, input: NewExpense) -> LedgerResult<Vec<MonthKey>> {
        let description = input.description.trim().to_string();
        if description.is_empty() {
            return Err(LedgerError::Validation(
                "Expense description cannot be empty".into(),
            ));
        }
        if input.amount.is_negative() {
            return Err(LedgerError::Validation(format!(
                "Expense amount cannot be negative (got {})",
                input.amount
            )));
        }

        let start = input.month;
        let end = if input.recurring {
            let horizon = self
                .ledger
                .settings()
                .recurrence_horizon_months
                .clamp(1, MAX_RECURRENCE_HORIZON_MONTHS);
            let end = input
                .recurrence_end
                .unwrap_or_else(|| start.add_months(horizon as i32 - 1));
            if end < start {
                return Err(LedgerError::Validation(format!(
                    "Recurrence end {} is before {}",
                    end, start
                )));
            }
            Some(end)
        } else {
            None
        };

        self.ledger.transact("add_expense", |state| {
            if !is_invoice_description(&description)
                && state.expenses.has_description(start, &description)
            {
                return Err(LedgerError::Duplicate {
                    entity_type: "Expense",
                    identifier: format!("{} in {}", description, start),
                });
            }

            let template = MonthlyExpense {
                recurring: input.recurring,
                recurrence_end: end,
                ..MonthlyExpense::new(description.as_str(), input.amount, input.due_day.trim())
            };

            state.expenses.month_mut(start).push(template.clone());
            state.expenses.checked_total(start)?;
            let mut written = vec![start];

            if let Some(end) = end {
                for month in start.next().through(end) {
                    if state.expenses.has_description(month, &description) {
                        continue;
                    }
                    state.expenses.month_mut(month).push(template.clone());
                    state.expenses.checked_total(month)?;
                    written.push(month);
                }
            }

            debug!(expense = %description, months = written.len(), "expense added");
            Ok(written)
        })
    }

    /// Flip the paid flag of an expense
    ///
    /// Marking an ordinary expense paid debits the wallet and fails on
    /// insufficient funds; a zero amount records no transaction, since history
    /// entries are always positive. Marking an invoice paid zeroes the card's
    /// usage without touching the wallet. Marking anything unpaid only flips
    /// the flag. Returns the new flag.
    pub fn toggle_paid(&mut self, month: MonthKey, index: usize) -> LedgerResult<bool> {
        let now = self.ledger.clock().now();

        self.ledger.transact("toggle_paid", |state| {
            let expense = state
                .expenses
                .get(month, index)
                .cloned()
                .ok_or_else(|| LedgerError::expense_not_found(month, index))?;

            if !expense.paid {
                if expense.is_invoice() {
                    clear_invoice_card(state, &expense);
                } else if expense.amount.is_positive() {
                    let txn = Transaction::at(
                        now,
                        TransactionKind::Outflow,
                        expense.amount,
                        expense.description.as_str(),
                        GENERAL_BANK,
                    );
                    commit_outflow(&mut state.wallet, txn)?;
                }
            }

            let entry = state
                .expenses
                .get_mut(month, index)
                .ok_or_else(|| LedgerError::expense_not_found(month, index))?;
            entry.paid = !entry.paid;
            Ok(entry.paid)
        })
    }

    pub fn update_amount(
        &mut self,
        month: MonthKey,
        index: usize,
        amount: Money,
    ) -> LedgerResult<()> {
        if amount.is_negative() {
            return Err(LedgerError::Validation(format!(
                "Expense amount cannot be negative (got {})",
                amount
            )));
        }
        self.update(month, index, |e| e.amount = amount)
    }

    pub fn update_due_day(
        &mut self,
        month: MonthKey,
        index: usize,
        due_day: &str,
    ) -> LedgerResult<()> {
        let due_day = due_day.trim().to_string();
        self.update(month, index, |e| e.due_day = due_day)
    }

    pub fn update_description(
        &mut self,
        month: MonthKey,
        index: usize,
        description: &str,
    ) -> LedgerResult<()> {
        let description = description.trim().to_string();
        if description.is_empty() {
            return Err(LedgerError::Validation(
                "Expense description cannot be empty".into(),
            ));
        }
        self.update(month, index, |e| e.description = description)
    }

    /// Remove an expense from its month only
    pub fn delete_expense(
        &mut self,
        month: MonthKey,
        index: usize,
    ) -> LedgerResult<MonthlyExpense> {
        self.ledger.transact("delete_expense", |state| {
            state
                .expenses
                .remove(month, index)
                .ok_or_else(|| LedgerError::expense_not_found(month, index))
        })
    }

    /// Sum of every expense in the month, paid or not
    pub fn monthly_total(&self, month: MonthKey) -> Money {
        self.ledger.state().expenses.total(month)
    }

    pub fn month_summary(&self, month: MonthKey) -> MonthSummary {
        self.ledger.state().expenses.summary(month)
    }

    pub fn months(&self) -> Vec<MonthKey> {
        self.ledger.state().expenses.months().collect()
    }

    fn update<F>(&mut self, month: MonthKey, index: usize, apply: F) -> LedgerResult<()>
    where
        F: FnOnce(&mut MonthlyExpense),
    {
        self.ledger.transact("update_expense", |state| {
            let expense = state
                .expenses
                .get_mut(month, index)
                .ok_or_else(|| LedgerError::expense_not_found(month, index))?;
            apply(expense);
            state.expenses.checked_total(month)?;
            Ok(())
        })
    }
}

/// Zero the usage of the card an invoice belongs to
fn clear_invoice_card(state: &mut LedgerState, invoice: &MonthlyExpense) {
    let card = match &invoice.card_id {
        Some(id) => state.card_by_id_mut(id),
        None => invoice_card_name(&invoice.description)
            .and_then(|name| state.card_by_name_mut(name)),
    };

    match card {
        Some(card) => {
            info!(card = %card.name, used = %card.used, "invoice marked paid, card cleared");
            card.used = Money::zero();
        }
        None => warn!(invoice = %invoice.description, "no card for invoice"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::ledger::test_support::*;
    use crate::services::{CardService, WalletService};

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    fn month(s: &str) -> MonthKey {
        MonthKey::parse(s).unwrap()
    }

    fn funded(amount: i64) -> (tempfile::TempDir, Ledger) {
        let (temp_dir, mut ledger) = ledger();
        WalletService::new(&mut ledger)
            .add_income(units(amount), "salary", "Geral")
            .unwrap();
        (temp_dir, ledger)
    }

    #[test]
    fn test_month_expenses_is_pure() {
        let (_temp_dir, mut ledger) = ledger();
        let service = ExpenseService::new(&mut ledger);

        assert!(service.month_expenses(month("2030-01")).is_empty());
        assert!(!service.months().contains(&month("2030-01")));
    }

    #[test]
    fn test_get_or_create_month() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = ExpenseService::new(&mut ledger);

        assert!(service.get_or_create_month(month("2030-01")).unwrap().is_empty());
        assert!(service.months().contains(&month("2030-01")));
        drop(service);
        assert!(reload(&ledger)
            .state()
            .expenses
            .contains_month(month("2030-01")));
    }

    #[test]
    fn test_add_expense_rejects_duplicate() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = ExpenseService::new(&mut ledger);

        service
            .add_expense(NewExpense::once(may(), "Rent", units(800), "5"))
            .unwrap();
        let err = service
            .add_expense(NewExpense::once(may(), "Rent", units(900), "5"))
            .unwrap_err();

        assert!(matches!(err, LedgerError::Duplicate { .. }));
        assert_eq!(service.month_expenses(may()).len(), 1);
    }

    #[test]
    fn test_invoice_names_bypass_duplicate_check() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = ExpenseService::new(&mut ledger);

        service
            .add_expense(NewExpense::once(may(), "Invoice Visa", units(10), "5"))
            .unwrap();
        service
            .add_expense(NewExpense::once(may(), "Invoice Visa", units(20), "5"))
            .unwrap();

        assert_eq!(service.month_expenses(may()).len(), 2);
    }

    #[test]
    fn test_add_expense_validation() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = ExpenseService::new(&mut ledger);

        assert!(service
            .add_expense(NewExpense::once(may(), " ", units(1), "5"))
            .is_err());
        assert!(service
            .add_expense(NewExpense::once(may(), "Gym", units(-1), "5"))
            .is_err());
        assert!(service
            .add_expense(NewExpense::once(may(), "Gym", units(1), "5").recurring(Some(may().prev())))
            .is_err());
    }

    #[test]
    fn test_recurring_until_end_month() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = ExpenseService::new(&mut ledger);
        service
            .add_expense(NewExpense::once(month("2024-07"), "Gym", units(99), "5"))
            .unwrap();

        let written = service
            .add_expense(
                NewExpense::once(may(), "Gym", units(100), "5").recurring(Some(month("2024-08"))),
            )
            .unwrap();

        assert_eq!(
            written,
            vec![month("2024-05"), month("2024-06"), month("2024-08")]
        );
        assert_eq!(service.month_expenses(month("2024-07"))[0].amount, units(99));
        let copy = &service.month_expenses(month("2024-08"))[0];
        assert!(copy.recurring);
        assert_eq!(copy.recurrence_end, Some(month("2024-08")));
        assert!(service.month_expenses(month("2024-09")).is_empty());
    }

    #[test]
    fn test_recurring_default_horizon() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = ExpenseService::new(&mut ledger);

        let written = service
            .add_expense(NewExpense::once(may(), "Internet", units(100), "10").recurring(None))
            .unwrap();

        assert_eq!(written.len(), 12);
        assert_eq!(written.last(), Some(&month("2025-04")));
        assert!(service.month_expenses(month("2025-05")).is_empty());
    }

    #[test]
    fn test_recurring_horizon_from_settings() {
        let settings = Settings {
            recurrence_horizon_months: 3,
            ..Settings::default()
        };
        let (_temp_dir, mut ledger) = ledger_with(settings);
        let mut service = ExpenseService::new(&mut ledger);

        let written = service
            .add_expense(NewExpense::once(may(), "Internet", units(100), "10").recurring(None))
            .unwrap();

        assert_eq!(written.last(), Some(&month("2024-07")));
    }

    #[test]
    fn test_toggle_paid_debits_wallet() {
        let (_temp_dir, mut ledger) = funded(1000);
        let mut service = ExpenseService::new(&mut ledger);
        service
            .add_expense(NewExpense::once(may(), "Rent", units(800), "5"))
            .unwrap();

        assert!(service.toggle_paid(may(), 0).unwrap());
        drop(service);

        let wallet = &ledger.state().wallet;
        assert_eq!(wallet.balance, units(200));
        assert_eq!(wallet.history.last().unwrap().description, "Rent");
    }

    #[test]
    fn test_toggle_zero_amount_records_nothing() {
        let (_temp_dir, mut ledger) = funded(100);
        let mut service = ExpenseService::new(&mut ledger);
        service
            .add_expense(NewExpense::once(may(), "Free trial", Money::zero(), "5"))
            .unwrap();

        assert!(service.toggle_paid(may(), 0).unwrap());
        drop(service);

        let wallet = &ledger.state().wallet;
        assert_eq!(wallet.balance, units(100));
        assert_eq!(wallet.history.len(), 1);
    }

    #[test]
    fn test_month_total_overflow_rejected() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = ExpenseService::new(&mut ledger);
        service
            .add_expense(NewExpense::once(may(), "Huge", Money::from_cents(i64::MAX - 5), "5"))
            .unwrap();

        let err = service
            .add_expense(NewExpense::once(may(), "More", units(1), "5").recurring(None))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.month_expenses(may()).len(), 1);
        assert!(service.month_expenses(may().next()).is_empty());

        service
            .add_expense(NewExpense::once(may(), "Small", Money::zero(), "5"))
            .unwrap();
        assert!(service.update_amount(may(), 1, units(1)).unwrap_err().is_validation());
        assert!(service.month_expenses(may())[1].amount.is_zero());
    }

    #[test]
    fn test_recurring_horizon_is_capped() {
        let settings = Settings {
            recurrence_horizon_months: u32::MAX,
            ..Settings::default()
        };
        let (_temp_dir, mut ledger) = ledger_with(settings);
        let mut service = ExpenseService::new(&mut ledger);

        let written = service
            .add_expense(NewExpense::once(may(), "Internet", units(1), "10").recurring(None))
            .unwrap();

        assert_eq!(written.len(), MAX_RECURRENCE_HORIZON_MONTHS as usize);
        assert_eq!(written.last(), Some(&may().add_months(1199)));
    }

    #[test]
    fn test_toggle_paid_insufficient_funds() {
        let (_temp_dir, mut ledger) = funded(100);
        let mut service = ExpenseService::new(&mut ledger);
        service
            .add_expense(NewExpense::once(may(), "Rent", units(800), "5"))
            .unwrap();

        let err = service.toggle_paid(may(), 0).unwrap_err();

        assert!(err.is_insufficient_funds());
        assert!(!service.month_expenses(may())[0].paid);
        drop(service);
        assert_eq!(ledger.state().wallet.balance, units(100));
    }

    #[test]
    fn test_toggle_unpaid_does_not_refund() {
        let (_temp_dir, mut ledger) = funded(1000);
        let mut service = ExpenseService::new(&mut ledger);
        service
            .add_expense(NewExpense::once(may(), "Rent", units(800), "5"))
            .unwrap();
        service.toggle_paid(may(), 0).unwrap();

        assert!(!service.toggle_paid(may(), 0).unwrap());
        drop(service);
        assert_eq!(ledger.state().wallet.balance, units(200));
    }

    #[test]
    fn test_toggle_invoice_clears_card_without_wallet() {
        let (_temp_dir, mut ledger) = ledger();
        let mut cards = CardService::new(&mut ledger);
        cards.add_card("Visa", units(2000), "10").unwrap();
        cards.set_used(0, units(300), may()).unwrap();

        let mut service = ExpenseService::new(&mut ledger);
        assert!(service.toggle_paid(may(), 0).unwrap());
        drop(service);

        let state = ledger.state();
        assert!(state.cards[0].used.is_zero());
        assert!(state.wallet.balance.is_zero());
        assert!(state.wallet.history.is_empty());
        assert!(state.expenses.month(may())[0].paid);
    }

    #[test]
    fn test_toggle_bad_index() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = ExpenseService::new(&mut ledger);
        assert!(service.toggle_paid(may(), 0).unwrap_err().is_not_found());
    }

    #[test]
    fn test_updates_and_delete() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = ExpenseService::new(&mut ledger);
        service
            .add_expense(NewExpense::once(may(), "Rent", units(800), "5"))
            .unwrap();
        service
            .add_expense(NewExpense::once(may(), "Water", units(60), "12"))
            .unwrap();

        service.update_amount(may(), 0, units(850)).unwrap();
        service.update_due_day(may(), 0, "7").unwrap();
        service.update_description(may(), 0, "Rent + fees").unwrap();

        let rent = &service.month_expenses(may())[0];
        assert_eq!(rent.amount, units(850));
        assert_eq!(rent.due_day, "7");
        assert_eq!(rent.description, "Rent + fees");
        assert!(service.update_description(may(), 0, "").is_err());
        assert!(service.update_amount(may(), 7, units(1)).unwrap_err().is_not_found());

        let removed = service.delete_expense(may(), 1).unwrap();
        assert_eq!(removed.description, "Water");
        assert_eq!(service.month_expenses(may()).len(), 1);
        assert!(service.delete_expense(may(), 5).is_err());
    }

    #[test]
    fn test_totals_include_paid_and_pending() {
        let (_temp_dir, mut ledger) = funded(1000);
        let mut service = ExpenseService::new(&mut ledger);
        service
            .add_expense(NewExpense::once(may(), "Rent", units(800), "5"))
            .unwrap();
        service
            .add_expense(NewExpense::once(may(), "Water", units(60), "12"))
            .unwrap();
        service.toggle_paid(may(), 1).unwrap();

        assert_eq!(service.monthly_total(may()), units(860));
        let summary = service.month_summary(may());
        assert_eq!(summary.paid, units(60));
        assert_eq!(summary.pending, units(800));
        assert_eq!(summary.count, 2);
    }
}
