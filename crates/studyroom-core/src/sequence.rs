//! Study-sequence progress tracking.
//!
//! Credits study-log minutes to the sequence item each log names, advances
//! the global cursor when the active item's goal is met, and keeps item
//! totals consistent under log edits and deletions.
//!
//! The cursor is advance-only: shrinking or deleting a log that previously
//! met a goal does not rewind an already-advanced cursor.

use chrono::NaiveDate;

use crate::model::{Streak, StudyLogEntry, StudySequence, Subject};

/// Credit a freshly added log to its sequence item and advance the cursor
/// if the active item's goal is now met.
///
/// A stale index (item subject no longer matching the log subject, or an
/// out-of-range index) applies no credit. A single log advances the cursor
/// by at most one step, regardless of overshoot.
pub(crate) fn credit_log(
    sequence: &mut StudySequence,
    sequence_index: &mut usize,
    subjects: &[Subject],
    entry: &StudyLogEntry,
) {
    let Some(index) = entry.sequence_item_index else {
        return;
    };
    let Some(item) = sequence.sequence.get_mut(index) else {
        return;
    };
    if item.subject_id != entry.subject_id {
        return;
    }
    item.total_time_studied_min += entry.duration_min;

    if index == *sequence_index {
        let goal = subjects
            .iter()
            .find(|s| s.id == item.subject_id)
            .and_then(|s| s.study_duration_min)
            .unwrap_or(0);
        if goal > 0 && item.total_time_studied_min >= goal {
            *sequence_index = (*sequence_index + 1).min(sequence.sequence.len());
        }
    }
}

/// Apply a duration edit as a difference against the item the old log
/// credited, so prior credit is not double-counted. Never rewinds the
/// cursor and never drops an item total below zero.
pub(crate) fn apply_duration_diff(
    sequence: &mut StudySequence,
    old_entry: &StudyLogEntry,
    new_duration_min: u32,
) {
    let Some(index) = old_entry.sequence_item_index else {
        return;
    };
    let Some(item) = sequence.sequence.get_mut(index) else {
        return;
    };
    if item.subject_id != old_entry.subject_id {
        return;
    }
    if new_duration_min >= old_entry.duration_min {
        item.total_time_studied_min += new_duration_min - old_entry.duration_min;
    } else {
        item.total_time_studied_min = item
            .total_time_studied_min
            .saturating_sub(old_entry.duration_min - new_duration_min);
    }
}

/// Remove a deleted log's full credit, clamped at zero.
pub(crate) fn remove_log_credit(sequence: &mut StudySequence, entry: &StudyLogEntry) {
    apply_duration_diff(sequence, entry, 0);
}

/// Streak bookkeeping for a newly added log: consecutive calendar day
/// increments, same day is a no-op, anything else resets to 1.
pub(crate) fn record_streak(streak: &mut Streak, date: NaiveDate) {
    match streak.last_studied {
        Some(last) if date == last => {}
        Some(last) if last.succ_opt() == Some(date) => {
            streak.count += 1;
            streak.last_studied = Some(date);
        }
        _ => {
            streak.count = 1;
            streak.last_studied = Some(date);
        }
    }
}
