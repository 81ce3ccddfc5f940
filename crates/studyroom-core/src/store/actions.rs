//! The reducer action surface.
//!
//! A tagged union covering every store mutation. Each action serializes
//! with a SCREAMING_SNAKE_CASE `type` discriminant, which is also what
//! the sync mirror keys remote writes on.

use serde::{Deserialize, Serialize};

use crate::model::{
    PomodoroSettings, SequenceTemplate, StudyLogEntry, StudySequence, Subject, Topic,
};

/// Partial update for a subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// A patch value of 0 clears the auto-advance goal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_duration_min: Option<u32>,
}

/// Partial update for a topic. `order` is reducer-managed and not
/// patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

/// Partial update for a study log entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyLogPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_correct: Option<u32>,
}

/// Every mutation of [`super::StoreState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    AddSubject {
        subject: Subject,
    },
    UpdateSubject {
        id: String,
        data: SubjectPatch,
    },
    DeleteSubject {
        id: String,
    },
    AddTopic {
        subject_id: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    ToggleTopicCompleted {
        subject_id: String,
        topic_id: String,
    },
    UpdateTopic {
        subject_id: String,
        topic_id: String,
        data: TopicPatch,
    },
    DeleteTopic {
        subject_id: String,
        topic_id: String,
    },
    SetRevisionProgress {
        subject_id: String,
        /// Clamped into `[0, relevant len]`; negative and huge values are
        /// legal inputs.
        progress: i64,
    },
    AddStudyLog {
        entry: StudyLogEntry,
    },
    UpdateStudyLog {
        id: String,
        data: StudyLogPatch,
    },
    DeleteStudyLog {
        id: String,
    },
    SaveStudySequence {
        sequence: Option<StudySequence>,
    },
    ResetStudySequence,
    AdvanceSequence,
    UpdatePomodoroSettings {
        settings: PomodoroSettings,
    },
    SaveTemplate {
        template: SequenceTemplate,
    },
    LoadTemplate {
        id: String,
    },
    DeleteTemplate {
        id: String,
    },
}

impl Action {
    /// The wire discriminant, used for logging and remote mirroring.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::AddSubject { .. } => "ADD_SUBJECT",
            Action::UpdateSubject { .. } => "UPDATE_SUBJECT",
            Action::DeleteSubject { .. } => "DELETE_SUBJECT",
            Action::AddTopic { .. } => "ADD_TOPIC",
            Action::ToggleTopicCompleted { .. } => "TOGGLE_TOPIC_COMPLETED",
            Action::UpdateTopic { .. } => "UPDATE_TOPIC",
            Action::DeleteTopic { .. } => "DELETE_TOPIC",
            Action::SetRevisionProgress { .. } => "SET_REVISION_PROGRESS",
            Action::AddStudyLog { .. } => "ADD_STUDY_LOG",
            Action::UpdateStudyLog { .. } => "UPDATE_STUDY_LOG",
            Action::DeleteStudyLog { .. } => "DELETE_STUDY_LOG",
            Action::SaveStudySequence { .. } => "SAVE_STUDY_SEQUENCE",
            Action::ResetStudySequence => "RESET_STUDY_SEQUENCE",
            Action::AdvanceSequence => "ADVANCE_SEQUENCE",
            Action::UpdatePomodoroSettings { .. } => "UPDATE_POMODORO_SETTINGS",
            Action::SaveTemplate { .. } => "SAVE_TEMPLATE",
            Action::LoadTemplate { .. } => "LOAD_TEMPLATE",
            Action::DeleteTemplate { .. } => "DELETE_TEMPLATE",
        }
    }
}

/// Construct the topic a `AddTopic` action will insert.
pub(crate) fn new_topic(subject: &Subject, name: String, id: Option<String>) -> Topic {
    Topic {
        id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        subject_id: subject.id.clone(),
        name,
        order: subject.topics.len(),
        is_completed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_serialize_with_screaming_snake_discriminant() {
        let action = Action::ResetStudySequence;
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "RESET_STUDY_SEQUENCE");

        let action = Action::SetRevisionProgress {
            subject_id: "s1".into(),
            progress: -3,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "SET_REVISION_PROGRESS");
        assert_eq!(json["progress"], -3);
    }

    #[test]
    fn kind_matches_serialized_type() {
        let action = Action::AdvanceSequence;
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], action.kind());
    }
}
