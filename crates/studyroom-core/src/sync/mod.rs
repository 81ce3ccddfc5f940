//! Remote mirroring layer.
//!
//! Dispatch is optimistic and local-first: the reducer applies every
//! action synchronously, then the writes it implies are queued and pushed
//! to an abstract remote document store in the background. Remote failures
//! are logged and retried with backoff; they never roll back or block
//! local state. Remote state is a durability mirror, re-read on next
//! start.

pub mod dispatcher;
pub mod mirror;
pub mod queue;
pub mod remote;
pub mod types;
pub mod worker;

#[cfg(test)]
mod queue_tests;

pub use dispatcher::SyncDispatcher;
pub use mirror::mirror_writes;
pub use queue::WriteQueue;
pub use remote::{FlakyRemote, JsonDirRemote, MemoryRemote};
pub use types::{Collection, RemoteStore, RemoteWrite, SyncError, WriteOp};
pub use worker::SyncWorker;
