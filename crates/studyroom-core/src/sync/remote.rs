//! Remote store implementations.
//!
//! `JsonDirRemote` is the CLI default: a document tree of JSON files. The
//! in-memory and failing variants exist for tests and embedders.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use super::types::{Collection, RemoteStore, SyncError};

/// Document store backed by a directory tree:
/// `<root>/<collection path>/<id>.json`.
pub struct JsonDirRemote {
    root: PathBuf,
}

impl JsonDirRemote {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn doc_path(&self, collection: &Collection, id: &str) -> PathBuf {
        self.root.join(collection.path()).join(format!("{id}.json"))
    }
}

#[async_trait]
impl RemoteStore for JsonDirRemote {
    async fn upsert(
        &self,
        collection: &Collection,
        id: &str,
        doc: serde_json::Value,
    ) -> Result<(), SyncError> {
        let path = self.doc_path(collection, id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
        Ok(())
    }

    async fn delete(&self, collection: &Collection, id: &str) -> Result<(), SyncError> {
        let path = self.doc_path(collection, id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory remote store, keyed by `collection path/id`.
#[derive(Default)]
pub struct MemoryRemote {
    docs: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc(&self, collection: &Collection, id: &str) -> Option<serde_json::Value> {
        self.docs
            .lock()
            .expect("remote lock poisoned")
            .get(&format!("{}/{id}", collection.path()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().expect("remote lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn upsert(
        &self,
        collection: &Collection,
        id: &str,
        doc: serde_json::Value,
    ) -> Result<(), SyncError> {
        self.docs
            .lock()
            .expect("remote lock poisoned")
            .insert(format!("{}/{id}", collection.path()), doc);
        Ok(())
    }

    async fn delete(&self, collection: &Collection, id: &str) -> Result<(), SyncError> {
        self.docs
            .lock()
            .expect("remote lock poisoned")
            .remove(&format!("{}/{id}", collection.path()));
        Ok(())
    }
}

/// Remote store that fails a configurable number of calls before
/// delegating to an inner [`MemoryRemote`]. Test-only behavior, public so
/// integration suites can use it.
pub struct FlakyRemote {
    pub inner: MemoryRemote,
    failures_left: Mutex<u32>,
}

impl FlakyRemote {
    pub fn failing(times: u32) -> Self {
        Self {
            inner: MemoryRemote::new(),
            failures_left: Mutex::new(times),
        }
    }

    pub fn doc(&self, collection: &Collection, id: &str) -> Option<serde_json::Value> {
        self.inner.doc(collection, id)
    }

    fn take_failure(&self) -> bool {
        let mut left = self.failures_left.lock().expect("remote lock poisoned");
        if *left > 0 {
            *left -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl RemoteStore for FlakyRemote {
    async fn upsert(
        &self,
        collection: &Collection,
        id: &str,
        doc: serde_json::Value,
    ) -> Result<(), SyncError> {
        if self.take_failure() {
            return Err(SyncError::Remote("simulated outage".into()));
        }
        self.inner.upsert(collection, id, doc).await
    }

    async fn delete(&self, collection: &Collection, id: &str) -> Result<(), SyncError> {
        if self.take_failure() {
            return Err(SyncError::Remote("simulated outage".into()));
        }
        self.inner.delete(collection, id).await
    }
}
