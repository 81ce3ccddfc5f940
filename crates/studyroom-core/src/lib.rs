//! # Studyroom Core Library
//!
//! This library provides the core business logic for Studyroom, a study
//! tracker built around two coupled scheduling problems: a Pomodoro-style
//! focus/break timer, and a subject-rotation study sequence feeding a
//! fixed-order spaced-repetition revision schedule. The CLI binary is a
//! thin layer over this library.
//!
//! ## Architecture
//!
//! - **Store**: a pure reducer `(state, action) -> state` owning all
//!   durable domain data (subjects, topics, study logs, sequences,
//!   templates, Pomodoro settings)
//! - **Pomodoro Engine**: a tick-driven state machine that requires the
//!   caller to invoke `tick()` once per second; focus-block completion
//!   emits the action that appends a study log
//! - **Sync**: optimistic local dispatch mirrored to an abstract remote
//!   document store through a write-behind queue; remote failures never
//!   roll back local state
//! - **Storage**: SQLite-backed local persistence with a debounced flush
//!   policy, and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Store`] / [`Action`]: the reducer boundary the UI layer drives
//! - [`PomodoroEngine`]: timer state machine
//! - [`SyncDispatcher`]: local-first dispatch with remote mirroring
//! - [`Database`] / [`Config`]: local persistence and configuration

pub mod clock;
pub mod error;
pub mod events;
pub mod model;
pub mod revision;
pub mod sequence;
pub mod stats;
pub mod storage;
pub mod store;
pub mod sync;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::TimerEvent;
pub use model::{
    ItemKind, LogSource, PomodoroSettings, PomodoroTask, SequenceTemplate, Streak, StudyLogEntry,
    StudySequence, StudySequenceItem, Subject, Topic,
};
pub use stats::StudyStats;
pub use storage::{Config, Database, StatePersister};
pub use store::{Action, Store, StoreState};
pub use sync::{
    Collection, FlakyRemote, JsonDirRemote, MemoryRemote, RemoteStore, RemoteWrite,
    SyncDispatcher, SyncError, SyncWorker, WriteOp, WriteQueue,
};
pub use timer::{completion_log, PomodoroEngine, PomodoroState, PomodoroStatus};
