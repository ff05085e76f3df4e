//! The full ledger state
//!
//! Everything that is persisted lives in one `LedgerState`. It is loaded whole
//! and saved whole.

use serde::Serialize;

use super::card::CreditCard;
use super::expense::ExpenseBook;
use super::ids::CardId;
use super::installment::Installment;
use super::month::MonthKey;
use super::wallet::Wallet;

/// Wallet, cards, monthly expenses and installment plans
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerState {
    pub wallet: Wallet,
    pub cards: Vec<CreditCard>,
    pub expenses: ExpenseBook,
    pub installments: Vec<Installment>,
}

impl LedgerState {
    /// Empty state with the given month pre-seeded in the expense book
    pub fn empty(current_month: MonthKey) -> Self {
        let mut state = Self::default();
        state.expenses.month_mut(current_month);
        state
    }

    pub fn card_by_id(&self, id: &CardId) -> Option<&CreditCard> {
        self.cards.iter().find(|c| c.id == *id)
    }

    pub fn card_by_id_mut(&mut self, id: &CardId) -> Option<&mut CreditCard> {
        self.cards.iter_mut().find(|c| c.id == *id)
    }

    /// First card with this name
    pub fn card_by_name_mut(&mut self, name: &str) -> Option<&mut CreditCard> {
        self.cards.iter_mut().find(|c| c.name == name)
    }
}
