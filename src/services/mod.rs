//! Service layer for wallet-ledger
//!
//! Each service borrows the `Ledger` and implements one component's
//! operations. Cross-component effects (invoice sync, wallet debits from
//! cards and expenses) go through crate-internal helpers on `LedgerState`, so
//! one operation always commits as one unit.

pub mod card;
pub mod expense;
pub mod installment;
pub mod wallet;

pub use card::{CardEdit, CardService, CardTotals};
pub use expense::{ExpenseService, NewExpense};
pub use installment::{InstallmentService, NewInstallment, RollSummary};
pub use wallet::WalletService;
