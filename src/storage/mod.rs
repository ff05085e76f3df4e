//! Storage layer for wallet-ledger
//!
//! The ledger persists as one JSON document that is read once at startup and
//! rewritten whole, atomically, after every change.

pub mod file_io;
pub mod snapshot;

pub use file_io::{read_json_value, write_json_atomic};
pub use snapshot::{decode, SnapshotStore};
