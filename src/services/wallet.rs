//! Wallet service
//!
//! Income and outflow recording, history edits and bank management. Every
//! mutation goes through `Ledger::transact`, so a rejected operation leaves the
//! wallet, banks and history untouched.

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::bank::is_general;
use crate::models::{Bank, Money, Transaction, TransactionKind, Wallet, GENERAL_BANK};

/// Service for wallet and bank operations
pub struct WalletService<'a> {
    ledger: &'a mut Ledger,
}

impl<'a> WalletService<'a> {
    /// Create a new wallet service
    pub fn new(ledger: &'a mut Ledger) -> Self {
        Self { ledger }
    }

    /// Record money coming in; the bank is created if unknown
    pub fn add_income(
        &mut self,
        amount: Money,
        description: &str,
        bank: &str,
    ) -> LedgerResult<Transaction> {
        let txn = self.build(TransactionKind::Income, amount, description, bank)?;

        self.ledger.transact("add_income", |state| {
            state.wallet.record(txn.clone())?;
            Ok(txn)
        })
    }

    /// Record money going out
    ///
    /// Rejected when the amount exceeds the total wallet balance, whatever the
    /// balance of the named bank.
    pub fn add_outflow(
        &mut self,
        amount: Money,
        description: &str,
        bank: &str,
    ) -> LedgerResult<Transaction> {
        let txn = self.build(TransactionKind::Outflow, amount, description, bank)?;

        self.ledger.transact("add_outflow", |state| {
            commit_outflow(&mut state.wallet, txn.clone())?;
            Ok(txn)
        })
    }

    /// Replace amount, description and bank of a past transaction
    ///
    /// Date and kind are kept. The old effect is reversed exactly before the
    /// new one is applied; no funds check is made.
    pub fn edit_transaction(
        &mut self,
        index: usize,
        amount: Money,
        description: &str,
        bank: &str,
    ) -> LedgerResult<Transaction> {
        let bank = bank_or_general(bank);

        self.ledger.transact("edit_transaction", |state| {
            let old = state
                .wallet
                .history
                .get(index)
                .cloned()
                .ok_or_else(|| LedgerError::transaction_not_found(index))?;

            let edited = Transaction::at(old.date, old.kind, amount, description.trim(), bank);
            edited
                .validate()
                .map_err(|e| LedgerError::Validation(e.to_string()))?;

            state.wallet.reverse(&old)?;
            state.wallet.apply(&edited)?;
            state.wallet.history[index] = edited.clone();
            Ok(edited)
        })
    }

    /// Remove a transaction and recompute every balance from the remaining history
    pub fn delete_transaction(&mut self, index: usize) -> LedgerResult<Transaction> {
        self.ledger.transact("delete_transaction", |state| {
            if index >= state.wallet.history.len() {
                return Err(LedgerError::transaction_not_found(index));
            }
            let removed = state.wallet.history.remove(index);
            state.wallet.replay()?;
            Ok(removed)
        })
    }

    /// Zero the wallet and every bank and clear the history
    pub fn reset_wallet(&mut self) -> LedgerResult<()> {
        self.ledger.transact("reset_wallet", |state| {
            let cleared = state.wallet.history.len();
            state.wallet.reset();
            info!(cleared, "wallet reset");
            Ok(())
        })
    }

    /// Add a bank; returns false if it already existed
    pub fn add_bank(&mut self, name: &str) -> LedgerResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Bank name cannot be empty".into()));
        }
        if self.ledger.state().wallet.has_bank(name) {
            return Ok(false);
        }

        self.ledger
            .transact("add_bank", |state| Ok(state.wallet.add_bank(name)))
    }

    /// Remove a bank, moving its transactions to the general bank
    ///
    /// Returns how many transactions were reassigned.
    pub fn delete_bank(&mut self, name: &str) -> LedgerResult<usize> {
        let name = name.trim();
        if is_general(name) {
            return Err(LedgerError::Reserved(GENERAL_BANK.into()));
        }

        self.ledger.transact("delete_bank", |state| {
            let position = state
                .wallet
                .banks
                .iter()
                .position(|b| b.name == name)
                .ok_or_else(|| LedgerError::bank_not_found(name))?;
            state.wallet.banks.remove(position);
            state.wallet.ensure_general();

            let mut reassigned = 0;
            for txn in state.wallet.history.iter_mut().filter(|t| t.bank == name) {
                txn.bank = GENERAL_BANK.to_string();
                reassigned += 1;
            }
            state.wallet.replay()?;

            info!(bank = name, reassigned, "bank deleted");
            Ok(reassigned)
        })
    }

    /// Balance of a bank; zero for unknown names
    pub fn bank_balance(&self, name: &str) -> Money {
        self.ledger.state().wallet.bank_balance(name)
    }

    pub fn balance(&self) -> Money {
        self.ledger.state().wallet.balance
    }

    pub fn history(&self) -> &[Transaction] {
        &self.ledger.state().wallet.history
    }

    pub fn wallet(&self) -> &Wallet {
        &self.ledger.state().wallet
    }

    pub fn banks(&self) -> &[Bank] {
        &self.ledger.state().wallet.banks
    }

    fn build(
        &self,
        kind: TransactionKind,
        amount: Money,
        description: &str,
        bank: &str,
    ) -> LedgerResult<Transaction> {
        let txn = Transaction::at(
            self.ledger.clock().now(),
            kind,
            amount,
            description.trim(),
            bank_or_general(bank),
        );
        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        Ok(txn)
    }
}

/// Append an outflow after checking it against the wallet total
///
/// Shared by invoice payment and expense payment.
pub(crate) fn commit_outflow(wallet: &mut Wallet, txn: Transaction) -> LedgerResult<()> {
    txn.validate()
        .map_err(|e| LedgerError::Validation(e.to_string()))?;

    if txn.amount > wallet.balance {
        return Err(LedgerError::InsufficientFunds {
            needed: txn.amount,
            available: wallet.balance,
        });
    }

    wallet.record(txn)?;
    Ok(())
}

fn bank_or_general(bank: &str) -> &str {
    let bank = bank.trim();
    if bank.is_empty() {
        GENERAL_BANK
    } else {
        bank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::*;

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    #[test]
    fn test_add_income_creates_bank() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);

        let txn = service.add_income(units(100), "salary", "Nubank").unwrap();

        assert!(txn.is_income());
        assert_eq!(service.balance(), units(100));
        assert_eq!(service.bank_balance("Nubank"), units(100));
        assert_eq!(service.history().len(), 1);
    }

    #[test]
    fn test_add_income_rejects_non_positive() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);

        assert!(service
            .add_income(Money::zero(), "nothing", "Nubank")
            .unwrap_err()
            .is_validation());
        assert!(service.add_income(units(-5), "negative", "Nubank").is_err());
        assert!(service.history().is_empty());
        assert!(!service.banks().iter().any(|b| b.name == "Nubank"));
    }

    #[test]
    fn test_income_overflow_rejected_without_change() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);
        service
            .add_income(Money::from_cents(i64::MAX - 10), "jackpot", "Itau")
            .unwrap();

        let before = ledger_snapshot(&service);
        let err = service.add_income(units(1), "one more", "Itau").unwrap_err();

        assert!(err.is_validation());
        assert_eq!(ledger_snapshot(&service), before);
        assert_eq!(reload(&*service.ledger).state().wallet, before);
    }

    #[test]
    fn test_outflow_rejected_above_balance() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);
        service.add_income(units(1000), "salary", "Geral").unwrap();

        let before = ledger_snapshot(&service);
        let err = service.add_outflow(units(1500), "rent", "Geral").unwrap_err();
        assert!(err.is_insufficient_funds());
        assert_eq!(ledger_snapshot(&service), before);
        assert_eq!(service.balance(), units(1000));

        service.add_outflow(units(500), "rent", "Geral").unwrap();
        assert_eq!(service.balance(), units(500));
    }

    #[test]
    fn test_outflow_checks_total_not_bank() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);
        service.add_income(units(100), "a", "Itau").unwrap();
        service.add_income(units(100), "b", "Nubank").unwrap();

        service.add_outflow(units(150), "tv", "Itau").unwrap();

        assert_eq!(service.balance(), units(50));
        assert_eq!(service.bank_balance("Itau"), units(-50));
        assert_eq!(service.bank_balance("Nubank"), units(100));
    }

    #[test]
    fn test_general_outflow_does_not_debit_bank() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);
        service.add_income(units(100), "a", "Geral").unwrap();

        service.add_outflow(units(40), "lunch", "").unwrap();

        assert_eq!(service.balance(), units(60));
        assert_eq!(service.bank_balance(GENERAL_BANK), units(100));
        assert_eq!(service.history()[1].bank, GENERAL_BANK);
    }

    #[test]
    fn test_named_banks_sum_to_balance() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);
        service.add_bank("Itau").unwrap();
        service.add_bank("Nubank").unwrap();

        service.add_income(units(300), "salary", "Itau").unwrap();
        service.add_income(units(200), "freelance", "Nubank").unwrap();
        service.add_outflow(units(120), "market", "Itau").unwrap();
        service.add_outflow(units(30), "bus", "Nubank").unwrap();

        assert_eq!(service.balance(), units(350));
        assert_eq!(service.ledger.state().wallet.bank_total(), service.balance());
    }

    #[test]
    fn test_edit_transaction_keeps_date_and_kind() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);
        let original = service.add_income(units(100), "salary", "Itau").unwrap();

        let edited = service
            .edit_transaction(0, units(80), "salary (net)", "Nubank")
            .unwrap();

        assert_eq!(edited.date, original.date);
        assert_eq!(edited.kind, TransactionKind::Income);
        assert_eq!(service.balance(), units(80));
        assert_eq!(service.bank_balance("Itau"), Money::zero());
        assert_eq!(service.bank_balance("Nubank"), units(80));
        assert_eq!(service.history()[0].description, "salary (net)");
    }

    #[test]
    fn test_edit_transaction_bad_index() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);

        let err = service
            .edit_transaction(3, units(1), "x", "Geral")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_matches_incremental_reversal() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);
        service.add_income(units(500), "salary", "Itau").unwrap();
        service.add_income(units(200), "bonus", "Nubank").unwrap();
        service.add_outflow(units(50), "gift", "Nubank").unwrap();
        service.add_outflow(units(20), "coffee", "Geral").unwrap();

        let mut expected = service.ledger.state().wallet.clone();
        let target = expected.history.remove(2);
        expected.reverse(&target).unwrap();

        service.delete_transaction(2).unwrap();

        let wallet = &service.ledger.state().wallet;
        assert_eq!(wallet.balance, expected.balance);
        assert_eq!(wallet.banks, expected.banks);
        assert_eq!(wallet.history, expected.history);
    }

    #[test]
    fn test_reset_wallet_keeps_banks() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);
        service.add_income(units(100), "a", "Itau").unwrap();

        service.reset_wallet().unwrap();

        assert!(service.balance().is_zero());
        assert!(service.history().is_empty());
        assert!(service.banks().iter().any(|b| b.name == "Itau"));
        assert!(service.bank_balance("Itau").is_zero());
    }

    #[test]
    fn test_add_bank_idempotent() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);

        assert!(service.add_bank("Itau").unwrap());
        assert!(!service.add_bank("Itau").unwrap());
        assert_eq!(
            service.banks().iter().filter(|b| b.name == "Itau").count(),
            1
        );
    }

    #[test]
    fn test_unknown_bank_balance_is_zero() {
        let (_temp_dir, mut ledger) = ledger();
        let service = WalletService::new(&mut ledger);
        assert_eq!(service.bank_balance("Nowhere"), Money::zero());
    }

    #[test]
    fn test_delete_bank_reassigns_to_general() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);
        service.add_income(units(100), "salary", "Itau").unwrap();
        service.add_outflow(units(30), "market", "Itau").unwrap();

        let moved = service.delete_bank("Itau").unwrap();

        assert_eq!(moved, 2);
        assert!(!service.banks().iter().any(|b| b.name == "Itau"));
        assert_eq!(service.balance(), units(70));
        assert_eq!(service.bank_balance(GENERAL_BANK), units(100));
        assert!(service.history().iter().all(|t| t.bank == GENERAL_BANK));
    }

    #[test]
    fn test_delete_bank_trims_name() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);
        service.add_bank(" Itau ").unwrap();

        assert_eq!(service.delete_bank(" Itau").unwrap(), 0);
        assert!(!service.banks().iter().any(|b| b.name == "Itau"));
        assert!(matches!(
            service.delete_bank(" Geral "),
            Err(LedgerError::Reserved(_))
        ));
    }

    #[test]
    fn test_delete_general_bank_rejected() {
        let (_temp_dir, mut ledger) = ledger();
        let mut service = WalletService::new(&mut ledger);

        assert!(matches!(
            service.delete_bank(GENERAL_BANK),
            Err(LedgerError::Reserved(_))
        ));
        assert!(service.delete_bank("Unknown").unwrap_err().is_not_found());
    }

    #[test]
    fn test_mutations_persist() {
        let (_temp_dir, mut ledger) = ledger();
        WalletService::new(&mut ledger)
            .add_income(units(42), "gift", "Itau")
            .unwrap();

        let reloaded = reload(&ledger);
        assert_eq!(reloaded.state().wallet.balance, units(42));
        assert_eq!(reloaded.state().wallet.bank_balance("Itau"), units(42));
    }

    fn ledger_snapshot(service: &WalletService<'_>) -> Wallet {
        service.ledger.state().wallet.clone()
    }
}
