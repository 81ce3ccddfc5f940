//! Core types for remote mirroring.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A remote collection addressed by entity id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "collection")]
pub enum Collection {
    Subjects,
    /// Topics are nested under their subject.
    Topics { subject_id: String },
    Logs,
    Sequences,
    Templates,
    Settings,
}

impl Collection {
    /// Slash-separated remote path for this collection.
    pub fn path(&self) -> String {
        match self {
            Collection::Subjects => "subjects".into(),
            Collection::Topics { subject_id } => format!("subjects/{subject_id}/topics"),
            Collection::Logs => "logs".into(),
            Collection::Sequences => "sequences".into(),
            Collection::Templates => "templates".into(),
            Collection::Settings => "settings".into(),
        }
    }
}

/// The two operations a mirror requires of the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum WriteOp {
    Upsert { doc: serde_json::Value },
    Delete,
}

/// One pending remote mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteWrite {
    pub collection: Collection,
    pub id: String,
    #[serde(flatten)]
    pub op: WriteOp,
}

impl RemoteWrite {
    pub fn upsert(collection: Collection, id: impl Into<String>, doc: serde_json::Value) -> Self {
        Self {
            collection,
            id: id.into(),
            op: WriteOp::Upsert { doc },
        }
    }

    pub fn delete(collection: Collection, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
            op: WriteOp::Delete,
        }
    }

    /// Coalescing key: later writes to the same document replace earlier
    /// pending ones.
    pub fn key(&self) -> String {
        format!("{}/{}", self.collection.path(), self.id)
    }
}

/// Abstract async document store. Upsert-by-id and delete-by-id are the
/// only operations the mirror needs.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn upsert(
        &self,
        collection: &Collection,
        id: &str,
        doc: serde_json::Value,
    ) -> Result<(), SyncError>;

    async fn delete(&self, collection: &Collection, id: &str) -> Result<(), SyncError>;
}

/// Remote mirroring errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_paths() {
        assert_eq!(Collection::Subjects.path(), "subjects");
        assert_eq!(
            Collection::Topics { subject_id: "s1".into() }.path(),
            "subjects/s1/topics"
        );
        assert_eq!(Collection::Sequences.path(), "sequences");
    }

    #[test]
    fn write_key_includes_collection_and_id() {
        let write = RemoteWrite::delete(Collection::Logs, "l1");
        assert_eq!(write.key(), "logs/l1");
    }

    #[test]
    fn writes_roundtrip_through_json() {
        let write = RemoteWrite::upsert(
            Collection::Topics { subject_id: "s1".into() },
            "t1",
            serde_json::json!({"name": "Cells"}),
        );
        let json = serde_json::to_string(&write).unwrap();
        let parsed: RemoteWrite = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, write);
    }
}
