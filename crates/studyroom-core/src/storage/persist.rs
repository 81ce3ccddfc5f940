//! Debounced state persistence.
//!
//! Dirty-flag + flush-on-quiet-interval-or-shutdown. Rapid mutations
//! coalesce into one write after a quiet period; the contract is
//! "eventually persisted, not necessarily after every action". Callers
//! that need durability now use [`StatePersister::flush`].

use chrono::{DateTime, Duration, Utc};

use crate::clock::Clock;
use crate::error::StorageError;
use crate::store::StoreState;

use super::database::Database;

/// Flush policy around [`Database::save_state`].
pub struct StatePersister<C: Clock> {
    db: Database,
    quiet: Duration,
    dirty_at: Option<DateTime<Utc>>,
    clock: C,
}

impl<C: Clock> StatePersister<C> {
    pub fn new(db: Database, quiet: Duration, clock: C) -> Self {
        Self {
            db,
            quiet,
            dirty_at: None,
            clock,
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_at.is_some()
    }

    /// Note a mutation. Restarts the quiet window.
    pub fn mark_dirty(&mut self) {
        self.dirty_at = Some(self.clock.now());
    }

    /// Write the snapshot if the state is dirty and the quiet window has
    /// passed. Returns whether a write happened.
    pub fn maybe_flush(&mut self, state: &StoreState) -> Result<bool, StorageError> {
        let Some(dirty_at) = self.dirty_at else {
            return Ok(false);
        };
        if self.clock.now() - dirty_at < self.quiet {
            return Ok(false);
        }
        self.flush(state)?;
        Ok(true)
    }

    /// Unconditional write; used on shutdown.
    pub fn flush(&mut self, state: &StoreState) -> Result<(), StorageError> {
        self.db.save_state(state)?;
        self.dirty_at = None;
        tracing::debug!("state snapshot flushed");
        Ok(())
    }
}
