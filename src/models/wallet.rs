//! Wallet model
//!
//! Holds the total balance, the per-bank balances, and the transaction history.
//! The methods here are the raw bookkeeping primitives (apply, reverse, replay);
//! input validation and funds checks live in `services::wallet`.

use serde::Serialize;

use super::bank::{is_general, Bank};
use super::money::{AmountOverflow, Money};
use super::transaction::{Transaction, TransactionKind};

/// Total balance, banks and history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wallet {
    pub balance: Money,
    pub history: Vec<Transaction>,
    pub banks: Vec<Bank>,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            balance: Money::zero(),
            history: Vec::new(),
            banks: vec![Bank::general()],
        }
    }
}

impl Wallet {
    /// Make sure the reserved "Geral" bank is present
    pub fn ensure_general(&mut self) {
        if !self.banks.iter().any(Bank::is_general) {
            self.banks.insert(0, Bank::general());
        }
    }

    pub fn bank(&self, name: &str) -> Option<&Bank> {
        self.banks.iter().find(|b| b.name == name)
    }

    pub fn has_bank(&self, name: &str) -> bool {
        self.bank(name).is_some()
    }

    /// Balance of a bank; zero for unknown names
    pub fn bank_balance(&self, name: &str) -> Money {
        self.bank(name).map(|b| b.balance).unwrap_or_default()
    }

    /// Add a bank if it does not exist yet; returns whether it was created
    pub fn add_bank(&mut self, name: &str) -> bool {
        if self.has_bank(name) {
            return false;
        }
        self.banks.push(Bank::new(name));
        true
    }

    fn bank_entry(&mut self, name: &str) -> &mut Bank {
        let index = match self.banks.iter().position(|b| b.name == name) {
            Some(index) => index,
            None => {
                self.banks.push(Bank::new(name));
                self.banks.len() - 1
            }
        };
        &mut self.banks[index]
    }

    /// Apply a transaction's effect to the balances (history untouched)
    ///
    /// Income credits the wallet and its bank. Outflow debits the wallet, and
    /// debits the bank only when it is not "Geral". Unknown banks are created.
    /// Nothing changes when a balance would overflow.
    pub fn apply(&mut self, txn: &Transaction) -> Result<(), AmountOverflow> {
        match txn.kind {
            TransactionKind::Income => self.shift(txn, Money::checked_add, true),
            TransactionKind::Outflow => {
                self.shift(txn, Money::checked_sub, !is_general(&txn.bank))
            }
        }
    }

    /// Undo exactly what `apply` did for this transaction
    pub fn reverse(&mut self, txn: &Transaction) -> Result<(), AmountOverflow> {
        match txn.kind {
            TransactionKind::Income => self.shift(txn, Money::checked_sub, true),
            TransactionKind::Outflow => {
                self.shift(txn, Money::checked_add, !is_general(&txn.bank))
            }
        }
    }

    fn shift(
        &mut self,
        txn: &Transaction,
        op: fn(Money, Money) -> Result<Money, AmountOverflow>,
        touch_bank: bool,
    ) -> Result<(), AmountOverflow> {
        let balance = op(self.balance, txn.amount)?;
        if touch_bank {
            let bank = self.bank_entry(&txn.bank);
            bank.balance = op(bank.balance, txn.amount)?;
        }
        self.balance = balance;
        Ok(())
    }

    /// Apply a transaction and append it to the history
    pub fn record(&mut self, txn: Transaction) -> Result<(), AmountOverflow> {
        self.apply(&txn)?;
        self.history.push(txn);
        Ok(())
    }

    /// Recompute every balance from zero by replaying the whole history
    pub fn replay(&mut self) -> Result<(), AmountOverflow> {
        self.balance = Money::zero();
        for bank in &mut self.banks {
            bank.balance = Money::zero();
        }

        let history = std::mem::take(&mut self.history);
        let replayed = history.iter().try_for_each(|txn| self.apply(txn));
        self.history = history;
        replayed
    }

    /// Zero all balances and clear the history; banks are kept
    pub fn reset(&mut self) {
        self.balance = Money::zero();
        self.history.clear();
        for bank in &mut self.banks {
            bank.balance = Money::zero();
        }
    }

    /// Sum of all bank balances
    pub fn bank_total(&self) -> Money {
        self.banks.iter().map(|b| b.balance).sum()
    }
}
