//! Reducer-driven data store.
//!
//! All durable domain state lives in [`StoreState`] and is mutated only by
//! [`reduce`], a pure total function over the [`Action`] union. The UI
//! layer (and the Pomodoro engine's completion side effect) interact with
//! the store exclusively through actions.

mod actions;
mod reducer;

pub use actions::{Action, StudyLogPatch, SubjectPatch, TopicPatch};
pub use reducer::reduce;

use serde::{Deserialize, Serialize};

use crate::model::{PomodoroSettings, SequenceTemplate, Streak, StudyLogEntry, StudySequence, Subject};

/// The full reducer-owned state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub logs: Vec<StudyLogEntry>,
    #[serde(default)]
    pub sequence: Option<StudySequence>,
    /// Global cursor into the current sequence, `0..=len`.
    #[serde(default)]
    pub sequence_index: usize,
    #[serde(default)]
    pub templates: Vec<SequenceTemplate>,
    pub settings: PomodoroSettings,
    #[serde(default)]
    pub streak: Streak,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            subjects: Vec::new(),
            logs: Vec::new(),
            sequence: None,
            sequence_index: 0,
            templates: Vec::new(),
            settings: PomodoroSettings::default(),
            streak: Streak::default(),
        }
    }
}

impl StoreState {
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Subject owning the given topic, with the topic itself.
    pub fn find_topic(&self, topic_id: &str) -> Option<(&Subject, &crate::model::Topic)> {
        self.subjects
            .iter()
            .find_map(|s| s.topic(topic_id).map(|t| (s, t)))
    }
}

/// Owned state plus synchronous dispatch.
#[derive(Debug, Default)]
pub struct Store {
    state: StoreState,
}

impl Store {
    pub fn new(state: StoreState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn into_state(self) -> StoreState {
        self.state
    }

    /// Apply an action. Always succeeds; invalid references are inert.
    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }
}
