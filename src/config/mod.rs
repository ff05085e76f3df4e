//! Configuration module for wallet-ledger
//!
//! - Path resolution for the settings file and the snapshot document
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::{Settings, MAX_RECURRENCE_HORIZON_MONTHS};
