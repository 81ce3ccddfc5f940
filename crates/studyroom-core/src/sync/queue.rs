//! Write-behind queue with debounce and retry backoff.
//!
//! Pending writes are keyed by document, so rapid edits to one entity
//! coalesce into the latest write. A failed send re-enters the queue with
//! exponential backoff until the attempt cap, then is dropped.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

use super::types::RemoteWrite;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PendingWrite {
    write: RemoteWrite,
    ready_at: DateTime<Utc>,
    attempts: u32,
}

/// Outbound queue between the dispatcher and the sync worker.
pub struct WriteQueue<C: Clock> {
    pending: HashMap<String, PendingWrite>,
    debounce: Duration,
    max_attempts: u32,
    queue_file: Option<PathBuf>,
    clock: C,
}

impl<C: Clock> WriteQueue<C> {
    pub fn new(clock: C, debounce: Duration, max_attempts: u32) -> Self {
        Self {
            pending: HashMap::new(),
            debounce,
            max_attempts,
            queue_file: None,
            clock,
        }
    }

    /// Persist the queue at `path` across restarts.
    pub fn with_queue_file(mut self, path: PathBuf) -> Self {
        self.queue_file = Some(path);
        self
    }

    /// Enqueue a write. A pending write for the same document is replaced
    /// and its debounce window restarts.
    pub fn enqueue(&mut self, write: RemoteWrite) {
        let ready_at = self.clock.now() + self.debounce;
        self.pending.insert(
            write.key(),
            PendingWrite {
                write,
                ready_at,
                attempts: 0,
            },
        );
    }

    /// Re-enqueue a failed write with backoff, unless a newer write for
    /// the same document arrived meanwhile or the attempt cap is reached.
    /// Returns false when the write was dropped.
    pub fn requeue_failed(&mut self, write: RemoteWrite, attempts: u32) -> bool {
        let attempts = attempts + 1;
        if attempts >= self.max_attempts {
            return false;
        }
        let key = write.key();
        if self.pending.contains_key(&key) {
            // Superseded while in flight; the newer write wins.
            return false;
        }
        let backoff = self.debounce * 2i32.saturating_pow(attempts);
        self.pending.insert(
            key,
            PendingWrite {
                write,
                ready_at: self.clock.now() + backoff,
                attempts,
            },
        );
        true
    }

    /// Drain up to `limit` writes whose debounce window has passed.
    pub fn drain_ready(&mut self, limit: usize) -> Vec<(RemoteWrite, u32)> {
        let now = self.clock.now();
        let mut ready = Vec::new();
        self.pending.retain(|_, pending| {
            if pending.ready_at <= now && ready.len() < limit {
                ready.push((pending.write.clone(), pending.attempts));
                false
            } else {
                true
            }
        });
        ready
    }

    /// Drain everything regardless of debounce; used on shutdown flush.
    pub fn drain_all(&mut self) -> Vec<(RemoteWrite, u32)> {
        self.pending
            .drain()
            .map(|(_, p)| (p.write, p.attempts))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time until the earliest pending write is ready, if any.
    pub fn time_until_next_batch(&self) -> Option<Duration> {
        let next = self.pending.values().map(|p| p.ready_at).min()?;
        let now = self.clock.now();
        Some((next - now).max(Duration::zero()))
    }

    /// Persist pending writes to the queue file, if configured.
    pub fn persist(&self) -> Result<(), std::io::Error> {
        let Some(path) = &self.queue_file else {
            return Ok(());
        };
        let data = serde_json::to_string_pretty(&self.pending)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load pending writes from the queue file, if present.
    pub fn load(&mut self) -> Result<(), std::io::Error> {
        let Some(path) = &self.queue_file else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(path)?;
        self.pending = serde_json::from_str(&content)?;
        Ok(())
    }
}
