//! Pomodoro timer.
//!
//! [`PomodoroEngine`] is the tick-driven state machine; [`completion_log`]
//! turns a finished focus block into the store action that records it.

mod engine;

pub use engine::{PomodoroEngine, PomodoroState, PomodoroStatus};

use crate::events::TimerEvent;
use crate::model::{ItemKind, LogSource, StudyLogEntry};
use crate::store::{Action, StoreState};

/// Build the automatic study-log action for a completed focus block.
///
/// Returns `None` when the caller opted into manual registration, when the
/// associated item no longer exists, or for non-completion events. The
/// sequence item index is attributed by matching the subject at the live
/// cursor, so a stale or reordered sequence simply yields an unattributed
/// log.
pub fn completion_log(state: &StoreState, event: &TimerEvent) -> Option<Action> {
    let TimerEvent::FocusCompleted {
        item_id,
        item_kind,
        effective_secs,
        auto_log,
        at,
    } = event
    else {
        return None;
    };
    if !auto_log {
        return None;
    }

    let (subject_id, topic_id) = match item_kind {
        ItemKind::Subject => {
            state.subject(item_id)?;
            (item_id.clone(), None)
        }
        ItemKind::Topic => {
            let (subject, topic) = state.find_topic(item_id)?;
            (subject.id.clone(), Some(topic.id.clone()))
        }
    };

    let sequence_item_index = state.sequence.as_ref().and_then(|seq| {
        seq.sequence
            .get(state.sequence_index)
            .filter(|item| item.subject_id == subject_id)
            .map(|_| state.sequence_index)
    });

    let mut entry = StudyLogEntry::new(subject_id, (effective_secs / 60) as u32, *at);
    entry.topic_id = topic_id;
    entry.source = LogSource::Pomodoro;
    entry.sequence_item_index = sequence_item_index;
    Some(Action::AddStudyLog { entry })
}
