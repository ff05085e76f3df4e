//! Ledger context
//!
//! `Ledger` owns the in-memory state, the snapshot store, the settings and the
//! clock. Services borrow it and route every mutation through
//! [`Ledger::transact`], which works on a copy of the state and only swaps it
//! in once the operation succeeded and the snapshot was written.

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::{LedgerPaths, Settings};
use crate::error::LedgerResult;
use crate::models::{LedgerState, MonthKey};
use crate::storage::SnapshotStore;

/// Explicit ledger context: state plus everything needed to persist it
pub struct Ledger {
    state: LedgerState,
    store: SnapshotStore,
    settings: Settings,
    clock: Box<dyn Clock>,
}

impl Ledger {
    /// Open the ledger stored under the given paths using the system clock
    pub fn open(paths: &LedgerPaths, settings: Settings) -> LedgerResult<Self> {
        paths.ensure_directories()?;
        let store = SnapshotStore::new(paths.snapshot_file());
        Ok(Self::load(store, settings, Box::new(SystemClock)))
    }

    /// Load state from a store with an explicit clock
    pub fn load(store: SnapshotStore, settings: Settings, clock: Box<dyn Clock>) -> Self {
        let state = store.load(clock.now());
        Self {
            state,
            store,
            settings,
            clock,
        }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn current_month(&self) -> MonthKey {
        self.clock.current_month()
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Run a mutation all-or-nothing and persist the result
    ///
    /// `op` runs against a working copy. If it fails, or the snapshot cannot
    /// be written, the ledger keeps its previous state.
    pub fn transact<T, F>(&mut self, op_name: &str, op: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut LedgerState) -> LedgerResult<T>,
    {
        let mut working = self.state.clone();
        let output = op(&mut working)?;

        self.store.save(&working)?;
        self.state = working;

        debug!(op = op_name, "committed");
        Ok(output)
    }

    /// Write the current state to disk as-is
    pub fn save(&self) -> LedgerResult<()> {
        self.store.save(&self.state)
    }
}
