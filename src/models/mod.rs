//! Core data models for wallet-ledger
//!
//! Banks, transactions, the wallet, credit cards, monthly expenses and
//! installment plans, plus the `Money` and `MonthKey` value types.

pub mod bank;
pub mod card;
pub mod expense;
pub mod ids;
pub mod installment;
pub mod money;
pub mod month;
pub mod state;
pub mod transaction;
pub mod wallet;

pub use bank::{Bank, GENERAL_BANK};
pub use card::{invoice_description, CreditCard, INVOICE_PREFIX};
pub use expense::{ExpenseBook, MonthSummary, MonthlyExpense};
pub use ids::CardId;
pub use installment::Installment;
pub use money::{AmountOverflow, Money};
pub use month::MonthKey;
pub use state::LedgerState;
pub use transaction::{Transaction, TransactionKind};
pub use wallet::Wallet;
