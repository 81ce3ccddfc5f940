//! Optimistic dispatch with remote mirroring.

use std::sync::{Arc, Mutex};

use crate::clock::Clock;
use crate::store::{Action, Store, StoreState};

use super::mirror::mirror_writes;
use super::queue::WriteQueue;

/// Wraps the store's dispatch: the reducer applies synchronously, then the
/// action's remote writes are queued for the background worker. Dispatch
/// never waits on, and never fails because of, the remote store.
pub struct SyncDispatcher<C: Clock> {
    store: Store,
    queue: Arc<Mutex<WriteQueue<C>>>,
}

impl<C: Clock> SyncDispatcher<C> {
    pub fn new(store: Store, queue: Arc<Mutex<WriteQueue<C>>>) -> Self {
        Self { store, queue }
    }

    pub fn state(&self) -> &StoreState {
        self.store.state()
    }

    pub fn into_store(self) -> Store {
        self.store
    }

    /// Apply `action` locally and queue its remote mirror writes.
    pub fn dispatch(&mut self, action: Action) {
        let kind = action.kind();
        self.store.dispatch(action.clone());
        let writes = mirror_writes(&action, self.store.state());
        tracing::debug!(action = kind, writes = writes.len(), "dispatched");
        let mut queue = self.queue.lock().expect("queue lock poisoned");
        for write in writes {
            queue.enqueue(write);
        }
    }
}
