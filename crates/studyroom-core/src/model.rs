//! Domain records.
//!
//! Plain serde types with no behavior beyond constructors and small
//! accessors. All mutation goes through the store reducer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A subject under study, owning its topics and a cursor into its derived
/// revision sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// Display color, `#rrggbb`.
    pub color: String,
    /// Minutes of accumulated study that complete this subject's slot in a
    /// study sequence. `None` or 0 means the slot never auto-advances.
    #[serde(default)]
    pub study_duration_min: Option<u32>,
    /// Cursor into [`crate::revision::relevant_sequence`], not into the
    /// fixed global cadence. Re-clamped by the reducer on every write that
    /// can change topic completion.
    #[serde(default)]
    pub revision_progress: usize,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

impl Subject {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
            study_duration_min: None,
            revision_progress: 0,
            topics: Vec::new(),
        }
    }

    pub fn topic(&self, topic_id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == topic_id)
    }
}

/// One unit of subject matter.
///
/// `order` is assigned densely at creation and renumbered densely on
/// deletion; it is the key the revision scheduler uses to locate topics
/// inside the fixed cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub subject_id: String,
    pub name: String,
    pub order: usize,
    #[serde(default)]
    pub is_completed: bool,
}

/// Where a study log entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    Manual,
    Pomodoro,
}

impl Default for LogSource {
    fn default() -> Self {
        LogSource::Manual
    }
}

/// One recorded block of study.
///
/// Immutable once created except through `UpdateStudyLog`, whose
/// duration edits retroactively adjust the study-sequence tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyLogEntry {
    pub id: String,
    pub subject_id: String,
    #[serde(default)]
    pub topic_id: Option<String>,
    pub date: DateTime<Utc>,
    pub duration_min: u32,
    #[serde(default)]
    pub start_page: Option<u32>,
    #[serde(default)]
    pub end_page: Option<u32>,
    #[serde(default)]
    pub questions_total: Option<u32>,
    #[serde(default)]
    pub questions_correct: Option<u32>,
    #[serde(default)]
    pub source: LogSource,
    /// Position in the current study sequence this entry credits, if any.
    #[serde(default)]
    pub sequence_item_index: Option<usize>,
}

impl StudyLogEntry {
    pub fn new(subject_id: impl Into<String>, duration_min: u32, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            subject_id: subject_id.into(),
            topic_id: None,
            date,
            duration_min,
            start_page: None,
            end_page: None,
            questions_total: None,
            questions_correct: None,
            source: LogSource::Manual,
            sequence_item_index: None,
        }
    }
}

/// One subject-slot within a study plan, accumulating minutes toward the
/// subject's goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySequenceItem {
    pub subject_id: String,
    #[serde(default)]
    pub total_time_studied_min: u32,
}

impl StudySequenceItem {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            total_time_studied_min: 0,
        }
    }
}

/// A named study plan: an ordered rotation of subject slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySequence {
    pub id: String,
    pub name: String,
    pub sequence: Vec<StudySequenceItem>,
}

impl StudySequence {
    pub fn new(name: impl Into<String>, sequence: Vec<StudySequenceItem>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            sequence,
        }
    }
}

/// A saved plan shape. Loading one installs it as the current sequence
/// with zeroed accumulated time and the cursor at 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceTemplate {
    pub id: String,
    pub name: String,
    pub items: Vec<StudySequenceItem>,
}

impl SequenceTemplate {
    pub fn new(name: impl Into<String>, items: Vec<StudySequenceItem>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            items,
        }
    }
}

/// One entry of the Pomodoro focus task list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroTask {
    pub id: String,
    pub name: String,
    pub duration_secs: u64,
}

impl PomodoroTask {
    pub fn new(name: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            duration_secs,
        }
    }
}

/// Pomodoro timer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    pub tasks: Vec<PomodoroTask>,
    pub short_break_secs: u64,
    pub long_break_secs: u64,
    pub cycles_until_long_break: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            tasks: vec![PomodoroTask::new("Focus", 25 * 60)],
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            cycles_until_long_break: 4,
        }
    }
}

/// What a running Pomodoro session is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Subject,
    Topic,
}

/// Consecutive-day study streak.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub count: u32,
    #[serde(default)]
    pub last_studied: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_roundtrips_through_json() {
        let mut subject = Subject::new("Anatomy", "#e11d48");
        subject.topics.push(Topic {
            id: "t1".into(),
            subject_id: subject.id.clone(),
            name: "Bones".into(),
            order: 0,
            is_completed: true,
        });
        let json = serde_json::to_string(&subject).unwrap();
        let parsed: Subject = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, subject);
    }

    #[test]
    fn log_entry_defaults_are_optional_in_json() {
        let json = r#"{
            "id": "l1",
            "subject_id": "s1",
            "date": "2026-08-01T10:00:00Z",
            "duration_min": 30
        }"#;
        let entry: StudyLogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.source, LogSource::Manual);
        assert!(entry.sequence_item_index.is_none());
    }

    #[test]
    fn default_settings_have_one_focus_task() {
        let settings = PomodoroSettings::default();
        assert_eq!(settings.tasks.len(), 1);
        assert_eq!(settings.tasks[0].duration_secs, 1500);
        assert_eq!(settings.cycles_until_long_break, 4);
    }
}
