//! wallet-ledger - Terminal personal finance tracker
//!
//! This library keeps a wallet (total balance, per-bank balances and an
//! editable transaction history), credit cards, installment purchases and
//! monthly expenses mutually consistent. All state lives in one JSON snapshot
//! that is loaded at startup and rewritten atomically after every change.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, months, cards, expenses, etc.)
//! - `storage`: Snapshot load/save with legacy format absorption
//! - `ledger`: The ledger context every operation runs through
//! - `services`: Business logic layer (wallet, cards, installments, expenses)
//! - `cli`: Command handlers for the `wallet` binary
//! - `display`: Plain-text formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use wallet_ledger::config::{LedgerPaths, Settings};
//! use wallet_ledger::ledger::Ledger;
//! use wallet_ledger::services::WalletService;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut ledger = Ledger::open(&paths, settings)?;
//! WalletService::new(&mut ledger).add_income(amount, "Salary", "Geral")?;
//! ```

pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod services;
pub mod storage;

pub use error::LedgerError;
