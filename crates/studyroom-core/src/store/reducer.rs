//! The reducer.
//!
//! Every handler returns the next state; nothing here fails. References to
//! missing entities are inert, matching the eventually-consistent posture
//! of the data.

use crate::model::StudySequence;
use crate::revision;
use crate::sequence;

use super::actions::{new_topic, Action};
use super::StoreState;

/// Pure transition function over the action union.
pub fn reduce(mut state: StoreState, action: Action) -> StoreState {
    match action {
        Action::AddSubject { mut subject } => {
            subject.revision_progress =
                revision::clamp_progress(&subject, subject.revision_progress as i64);
            state.subjects.push(subject);
        }
        Action::UpdateSubject { id, data } => {
            if let Some(subject) = state.subjects.iter_mut().find(|s| s.id == id) {
                if let Some(name) = data.name {
                    subject.name = name;
                }
                if let Some(color) = data.color {
                    subject.color = color;
                }
                if let Some(goal) = data.study_duration_min {
                    subject.study_duration_min = (goal > 0).then_some(goal);
                }
            }
        }
        Action::DeleteSubject { id } => {
            state.subjects.retain(|s| s.id != id);
        }
        Action::AddTopic { subject_id, name, id } => {
            if let Some(subject) = state.subjects.iter_mut().find(|s| s.id == subject_id) {
                let topic = new_topic(subject, name, id);
                subject.topics.push(topic);
            }
        }
        Action::ToggleTopicCompleted { subject_id, topic_id } => {
            if let Some(subject) = state.subjects.iter_mut().find(|s| s.id == subject_id) {
                if let Some(topic) = subject.topics.iter_mut().find(|t| t.id == topic_id) {
                    topic.is_completed = !topic.is_completed;
                }
                reclamp(subject);
            }
        }
        Action::UpdateTopic { subject_id, topic_id, data } => {
            if let Some(subject) = state.subjects.iter_mut().find(|s| s.id == subject_id) {
                if let Some(topic) = subject.topics.iter_mut().find(|t| t.id == topic_id) {
                    if let Some(name) = data.name {
                        topic.name = name;
                    }
                    if let Some(done) = data.is_completed {
                        topic.is_completed = done;
                    }
                }
                reclamp(subject);
            }
        }
        Action::DeleteTopic { subject_id, topic_id } => {
            if let Some(subject) = state.subjects.iter_mut().find(|s| s.id == subject_id) {
                subject.topics.retain(|t| t.id != topic_id);
                // Dense renumber, relative order preserved.
                subject.topics.sort_by_key(|t| t.order);
                for (i, topic) in subject.topics.iter_mut().enumerate() {
                    topic.order = i;
                }
                reclamp(subject);
            }
        }
        Action::SetRevisionProgress { subject_id, progress } => {
            if let Some(subject) = state.subjects.iter_mut().find(|s| s.id == subject_id) {
                subject.revision_progress = revision::clamp_progress(subject, progress);
            }
        }
        Action::AddStudyLog { entry } => {
            if let Some(seq) = state.sequence.as_mut() {
                sequence::credit_log(seq, &mut state.sequence_index, &state.subjects, &entry);
            }
            sequence::record_streak(&mut state.streak, entry.date.date_naive());
            state.logs.push(entry);
        }
        Action::UpdateStudyLog { id, data } => {
            let old = state.logs.iter().find(|l| l.id == id).cloned();
            if let Some(old) = old {
                if let Some(new_duration) = data.duration_min {
                    if let Some(seq) = state.sequence.as_mut() {
                        sequence::apply_duration_diff(seq, &old, new_duration);
                    }
                }
            }
            if let Some(entry) = state.logs.iter_mut().find(|l| l.id == id) {
                if let Some(topic_id) = data.topic_id {
                    entry.topic_id = Some(topic_id);
                }
                if let Some(date) = data.date {
                    entry.date = date;
                }
                if let Some(duration) = data.duration_min {
                    entry.duration_min = duration;
                }
                if let Some(v) = data.start_page {
                    entry.start_page = Some(v);
                }
                if let Some(v) = data.end_page {
                    entry.end_page = Some(v);
                }
                if let Some(v) = data.questions_total {
                    entry.questions_total = Some(v);
                }
                if let Some(v) = data.questions_correct {
                    entry.questions_correct = Some(v);
                }
            }
        }
        Action::DeleteStudyLog { id } => {
            if let Some(pos) = state.logs.iter().position(|l| l.id == id) {
                let entry = state.logs.remove(pos);
                if let Some(seq) = state.sequence.as_mut() {
                    sequence::remove_log_credit(seq, &entry);
                }
            }
        }
        Action::SaveStudySequence { sequence: incoming } => match incoming {
            Some(mut new_seq) => {
                let is_new_plan = state
                    .sequence
                    .as_ref()
                    .map(|s| s.id != new_seq.id)
                    .unwrap_or(true);
                if is_new_plan {
                    for item in &mut new_seq.sequence {
                        item.total_time_studied_min = 0;
                    }
                    state.sequence_index = 0;
                } else {
                    // Keep the cursor only when it still points at the same
                    // subject; a reorder must not credit time to the wrong one.
                    let old_at_cursor = state
                        .sequence
                        .as_ref()
                        .and_then(|s| s.sequence.get(state.sequence_index))
                        .map(|i| i.subject_id.clone());
                    let new_at_cursor = new_seq
                        .sequence
                        .get(state.sequence_index)
                        .map(|i| i.subject_id.clone());
                    match (old_at_cursor, new_at_cursor) {
                        (Some(old), Some(new)) if old == new => {}
                        _ => state.sequence_index = 0,
                    }
                }
                state.sequence = Some(new_seq);
            }
            None => {
                state.sequence = None;
                state.sequence_index = 0;
            }
        },
        Action::ResetStudySequence => {
            if let Some(seq) = state.sequence.as_mut() {
                for item in &mut seq.sequence {
                    item.total_time_studied_min = 0;
                }
            }
            state.sequence_index = 0;
        }
        Action::AdvanceSequence => {
            let len = state.sequence.as_ref().map(|s| s.sequence.len()).unwrap_or(0);
            state.sequence_index = (state.sequence_index + 1).min(len);
        }
        Action::UpdatePomodoroSettings { settings } => {
            state.settings = settings;
        }
        Action::SaveTemplate { template } => {
            if let Some(existing) = state.templates.iter_mut().find(|t| t.id == template.id) {
                *existing = template;
            } else {
                state.templates.push(template);
            }
        }
        Action::LoadTemplate { id } => {
            if let Some(template) = state.templates.iter().find(|t| t.id == id) {
                let mut items = template.items.clone();
                for item in &mut items {
                    item.total_time_studied_min = 0;
                }
                state.sequence = Some(StudySequence {
                    id: template.id.clone(),
                    name: template.name.clone(),
                    sequence: items,
                });
                state.sequence_index = 0;
            }
        }
        Action::DeleteTemplate { id } => {
            state.templates.retain(|t| t.id != id);
        }
    }
    state
}

fn reclamp(subject: &mut crate::model::Subject) {
    subject.revision_progress =
        revision::clamp_progress(subject, subject.revision_progress as i64);
}
