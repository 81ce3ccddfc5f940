//! Timer events.
//!
//! Every Pomodoro engine transition produces an event. The CLI prints
//! them; the completion side effect consumes `FocusCompleted`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ItemKind;
use crate::timer::PomodoroStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    FocusStarted {
        item_id: String,
        item_kind: ItemKind,
        task_index: Option<usize>,
        duration_secs: u64,
        is_custom_duration: bool,
        at: DateTime<Utc>,
    },
    /// Moved to the next task of the focus block without a break.
    TaskAdvanced {
        from_task: usize,
        to_task: usize,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// A focus block fully finished (tasks exhausted or custom duration
    /// expired). Carries everything the completion side effect needs.
    FocusCompleted {
        item_id: String,
        item_kind: ItemKind,
        effective_secs: u64,
        /// False when the caller flagged that the session will be logged
        /// manually; the automatic log is suppressed exactly once.
        auto_log: bool,
        at: DateTime<Utc>,
    },
    BreakStarted {
        is_long: bool,
        cycle: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        previous: PomodoroStatus,
        time_remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        status: PomodoroStatus,
        time_remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        at: DateTime<Utc>,
    },
}
