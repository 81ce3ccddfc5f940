//! Background sync worker.

use std::sync::{Arc, Mutex};

use crate::clock::Clock;

use super::queue::WriteQueue;
use super::types::{RemoteStore, RemoteWrite, WriteOp};

const DRAIN_BATCH: usize = 32;

/// Drains the write queue against the remote store.
pub struct SyncWorker;

impl SyncWorker {
    /// Spawn the background loop. Runs until the task is aborted.
    pub fn spawn<C>(
        queue: Arc<Mutex<WriteQueue<C>>>,
        remote: Arc<dyn RemoteStore>,
    ) -> tokio::task::JoinHandle<()>
    where
        C: Clock + Send + 'static,
    {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(std::time::Duration::from_millis(250)).await;
                Self::process_ready(&queue, remote.as_ref()).await;
            }
        })
    }

    /// Send every write whose debounce window has passed.
    pub async fn process_ready<C: Clock>(
        queue: &Arc<Mutex<WriteQueue<C>>>,
        remote: &dyn RemoteStore,
    ) {
        let batch = {
            let mut queue = queue.lock().expect("queue lock poisoned");
            queue.drain_ready(DRAIN_BATCH)
        };
        Self::send_batch(queue, remote, batch).await;
    }

    /// Shutdown flush: send everything pending, debounce windows included.
    pub async fn flush<C: Clock>(queue: &Arc<Mutex<WriteQueue<C>>>, remote: &dyn RemoteStore) {
        let batch = {
            let mut queue = queue.lock().expect("queue lock poisoned");
            queue.drain_all()
        };
        Self::send_batch(queue, remote, batch).await;
    }

    async fn send_batch<C: Clock>(
        queue: &Arc<Mutex<WriteQueue<C>>>,
        remote: &dyn RemoteStore,
        batch: Vec<(RemoteWrite, u32)>,
    ) {
        for (write, attempts) in batch {
            if let Err(error) = Self::send(remote, &write).await {
                let key = write.key();
                let kept = queue
                    .lock()
                    .expect("queue lock poisoned")
                    .requeue_failed(write, attempts);
                if kept {
                    tracing::warn!(%key, %error, attempts = attempts + 1, "remote write failed, will retry");
                } else {
                    tracing::warn!(%key, %error, "remote write dropped");
                }
            }
        }
    }

    async fn send(
        remote: &dyn RemoteStore,
        write: &RemoteWrite,
    ) -> Result<(), super::types::SyncError> {
        match &write.op {
            WriteOp::Upsert { doc } => {
                remote.upsert(&write.collection, &write.id, doc.clone()).await
            }
            WriteOp::Delete => remote.delete(&write.collection, &write.id).await,
        }
    }
}
