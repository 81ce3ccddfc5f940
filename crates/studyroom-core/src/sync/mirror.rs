//! Action-to-remote-write derivation.
//!
//! Keyed by action type, evaluated against the post-reduce state so the
//! mirrored documents include every knock-on change (re-clamped revision
//! cursors, renumbered topic orders, sequence credit, streaks). Writes for
//! entities the reducer ignored (stale references) simply do not appear.

use crate::model::Streak;
use crate::store::{Action, StoreState};

use super::types::{Collection, RemoteWrite};

const CURRENT_SEQUENCE_DOC: &str = "current";
const POMODORO_SETTINGS_DOC: &str = "pomodoro";
const STREAK_DOC: &str = "streak";

/// Remote writes implied by `action`, given the state after reduction.
pub fn mirror_writes(action: &Action, state: &StoreState) -> Vec<RemoteWrite> {
    let mut writes = Vec::new();
    match action {
        Action::AddSubject { subject } => {
            push_subject(&mut writes, state, &subject.id);
        }
        Action::UpdateSubject { id, .. } => {
            push_subject(&mut writes, state, id);
        }
        Action::DeleteSubject { id } => {
            writes.push(RemoteWrite::delete(Collection::Subjects, id.clone()));
        }
        Action::AddTopic { subject_id, .. } => {
            // The new topic is the highest-order one.
            if let Some(topic) = state
                .subject(subject_id)
                .and_then(|s| s.topics.iter().max_by_key(|t| t.order))
            {
                writes.push(topic_upsert(subject_id, topic));
            }
        }
        Action::ToggleTopicCompleted { subject_id, topic_id }
        | Action::UpdateTopic { subject_id, topic_id, .. } => {
            if let Some(topic) = state.subject(subject_id).and_then(|s| s.topic(topic_id)) {
                writes.push(topic_upsert(subject_id, topic));
                // Completion changes can re-clamp the revision cursor.
                push_subject(&mut writes, state, subject_id);
            }
        }
        Action::DeleteTopic { subject_id, topic_id } => {
            if let Some(subject) = state.subject(subject_id) {
                writes.push(RemoteWrite::delete(
                    Collection::Topics { subject_id: subject_id.clone() },
                    topic_id.clone(),
                ));
                // Surviving topics were renumbered.
                for topic in &subject.topics {
                    writes.push(topic_upsert(subject_id, topic));
                }
                push_subject(&mut writes, state, subject_id);
            }
        }
        Action::SetRevisionProgress { subject_id, .. } => {
            push_subject(&mut writes, state, subject_id);
        }
        Action::AddStudyLog { entry } => {
            if let Some(log) = state.logs.iter().find(|l| l.id == entry.id) {
                writes.push(RemoteWrite::upsert(
                    Collection::Logs,
                    log.id.clone(),
                    doc(log),
                ));
            }
            push_sequence(&mut writes, state);
            push_streak(&mut writes, &state.streak);
        }
        Action::UpdateStudyLog { id, .. } => {
            if let Some(log) = state.logs.iter().find(|l| l.id == *id) {
                writes.push(RemoteWrite::upsert(
                    Collection::Logs,
                    log.id.clone(),
                    doc(log),
                ));
                push_sequence(&mut writes, state);
            }
        }
        Action::DeleteStudyLog { id } => {
            writes.push(RemoteWrite::delete(Collection::Logs, id.clone()));
            push_sequence(&mut writes, state);
        }
        Action::SaveStudySequence { sequence } => {
            if sequence.is_some() {
                push_sequence(&mut writes, state);
            } else {
                writes.push(RemoteWrite::delete(
                    Collection::Sequences,
                    CURRENT_SEQUENCE_DOC,
                ));
            }
        }
        Action::ResetStudySequence | Action::AdvanceSequence | Action::LoadTemplate { .. } => {
            push_sequence(&mut writes, state);
        }
        Action::UpdatePomodoroSettings { .. } => {
            writes.push(RemoteWrite::upsert(
                Collection::Settings,
                POMODORO_SETTINGS_DOC,
                doc(&state.settings),
            ));
        }
        Action::SaveTemplate { template } => {
            if let Some(template) = state.templates.iter().find(|t| t.id == template.id) {
                writes.push(RemoteWrite::upsert(
                    Collection::Templates,
                    template.id.clone(),
                    doc(template),
                ));
            }
        }
        Action::DeleteTemplate { id } => {
            writes.push(RemoteWrite::delete(Collection::Templates, id.clone()));
        }
    }
    writes
}

fn doc<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

fn push_subject(writes: &mut Vec<RemoteWrite>, state: &StoreState, id: &str) {
    if let Some(subject) = state.subject(id) {
        writes.push(RemoteWrite::upsert(
            Collection::Subjects,
            subject.id.clone(),
            doc(subject),
        ));
    }
}

fn topic_upsert(subject_id: &str, topic: &crate::model::Topic) -> RemoteWrite {
    RemoteWrite::upsert(
        Collection::Topics { subject_id: subject_id.to_string() },
        topic.id.clone(),
        doc(topic),
    )
}

fn push_sequence(writes: &mut Vec<RemoteWrite>, state: &StoreState) {
    if let Some(seq) = &state.sequence {
        let mut value = doc(seq);
        if let Some(obj) = value.as_object_mut() {
            obj.insert("sequence_index".into(), state.sequence_index.into());
        }
        writes.push(RemoteWrite::upsert(
            Collection::Sequences,
            CURRENT_SEQUENCE_DOC,
            value,
        ));
    }
}

fn push_streak(writes: &mut Vec<RemoteWrite>, streak: &Streak) {
    writes.push(RemoteWrite::upsert(
        Collection::Settings,
        STREAK_DOC,
        doc(streak),
    ));
}
