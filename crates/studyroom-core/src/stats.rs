//! Derived study statistics.
//!
//! Pure read-only queries over the store; nothing here is stored.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::LogSource;
use crate::store::StoreState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyStats {
    pub total_sessions: u64,
    pub total_min: u64,
    pub today_sessions: u64,
    pub today_min: u64,
    pub pomodoro_sessions: u64,
    /// Minutes per subject name, alphabetical.
    pub per_subject_min: BTreeMap<String, u64>,
    pub streak_days: u32,
}

/// Compute statistics for the given calendar day.
pub fn study_stats(state: &StoreState, today: NaiveDate) -> StudyStats {
    let mut stats = StudyStats {
        streak_days: state.streak.count,
        ..StudyStats::default()
    };

    for log in &state.logs {
        stats.total_sessions += 1;
        stats.total_min += u64::from(log.duration_min);
        if log.source == LogSource::Pomodoro {
            stats.pomodoro_sessions += 1;
        }
        if log.date.date_naive() == today {
            stats.today_sessions += 1;
            stats.today_min += u64::from(log.duration_min);
        }
        let name = state
            .subject(&log.subject_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| log.subject_id.clone());
        *stats.per_subject_min.entry(name).or_insert(0) += u64::from(log.duration_min);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StudyLogEntry, Subject};
    use chrono::Utc;

    #[test]
    fn aggregates_by_day_and_subject() {
        let mut state = StoreState::default();
        let subject = Subject::new("Latin", "#a855f7");
        let id = subject.id.clone();
        state.subjects.push(subject);

        let today = Utc::now();
        let yesterday = today - chrono::Duration::days(1);
        state.logs.push(StudyLogEntry::new(&id, 30, today));
        state.logs.push(StudyLogEntry::new(&id, 20, yesterday));
        let mut pomo = StudyLogEntry::new("gone-subject", 10, today);
        pomo.source = LogSource::Pomodoro;
        state.logs.push(pomo);

        let stats = study_stats(&state, today.date_naive());
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.total_min, 60);
        assert_eq!(stats.today_sessions, 2);
        assert_eq!(stats.today_min, 40);
        assert_eq!(stats.pomodoro_sessions, 1);
        assert_eq!(stats.per_subject_min["Latin"], 50);
        // Logs for deleted subjects fall back to the raw id.
        assert_eq!(stats.per_subject_min["gone-subject"], 10);
    }
}
