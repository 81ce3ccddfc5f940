//! Pomodoro engine implementation.
//!
//! A tick-driven state machine. It holds no timer of its own -- the caller
//! invokes `tick()` once per second while a session runs. Elapsed focus
//! time is derived from recorded segment durations, never from wall-clock
//! sampling, so a suspended caller loses ticks rather than miscounting.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Focus -> (ShortBreak | LongBreak) -> Focus -> ...
//!           |                |
//!           +---> Paused <---+
//! ```
//!
//! Within a non-custom focus block, task-list entries chain back-to-back
//! without a break; only exhausting the list ends the block.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::TimerEvent;
use crate::model::{ItemKind, PomodoroSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroStatus {
    Idle,
    Focus,
    ShortBreak,
    LongBreak,
    Paused,
}

/// Ephemeral timer state. Never persisted across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroState {
    pub status: PomodoroStatus,
    pub time_remaining_secs: u64,
    /// Completed focus blocks since the engine last went idle; drives the
    /// long-break cadence.
    pub current_cycle: u32,
    pub current_task_index: Option<usize>,
    pub associated_item_id: Option<String>,
    pub associated_item_kind: Option<ItemKind>,
    pub is_custom_duration: bool,
    /// Configured duration of the running segment; with `time_remaining`
    /// this yields elapsed time without wall-clock sampling.
    pub original_duration_secs: Option<u64>,
    /// Seconds from already-finished task segments of the running block.
    pub block_elapsed_secs: u64,
    pub previous_status: Option<PomodoroStatus>,
    /// The next focus completion skips the automatic log.
    pub suppress_auto_log: bool,
    /// Monotonic re-render token; bumped whenever the visible timer
    /// reloads.
    pub key: u64,
}

impl Default for PomodoroState {
    fn default() -> Self {
        Self {
            status: PomodoroStatus::Idle,
            time_remaining_secs: 0,
            current_cycle: 0,
            current_task_index: None,
            associated_item_id: None,
            associated_item_kind: None,
            is_custom_duration: false,
            original_duration_secs: None,
            block_elapsed_secs: 0,
            previous_status: None,
            suppress_auto_log: false,
            key: 0,
        }
    }
}

/// Core timer engine. Owns the settings snapshot and the ephemeral state.
#[derive(Debug, Clone)]
pub struct PomodoroEngine {
    settings: PomodoroSettings,
    state: PomodoroState,
}

impl PomodoroEngine {
    pub fn new(settings: PomodoroSettings) -> Self {
        Self {
            settings,
            state: PomodoroState::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &PomodoroState {
        &self.state
    }

    pub fn status(&self) -> PomodoroStatus {
        self.state.status
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a focus session for a subject or topic.
    ///
    /// With `custom_duration_secs` the session is a single fixed block not
    /// tied to the task list. Otherwise the first task-list entry loads;
    /// an empty task list cannot start. `manual_registration` suppresses
    /// the automatic study log for this block only.
    ///
    /// Only valid from idle.
    pub fn start_for_item(
        &mut self,
        item_id: impl Into<String>,
        item_kind: ItemKind,
        custom_duration_secs: Option<u64>,
        manual_registration: bool,
    ) -> Option<TimerEvent> {
        if self.state.status != PomodoroStatus::Idle {
            return None;
        }
        let (duration, task_index, is_custom) = match custom_duration_secs {
            Some(secs) if secs > 0 => (secs, None, true),
            _ => {
                let first = self.settings.tasks.first()?;
                (first.duration_secs, Some(0), false)
            }
        };

        self.state.status = PomodoroStatus::Focus;
        self.state.time_remaining_secs = duration;
        self.state.current_task_index = task_index;
        self.state.associated_item_id = Some(item_id.into());
        self.state.associated_item_kind = Some(item_kind);
        self.state.is_custom_duration = is_custom;
        self.state.original_duration_secs = Some(duration);
        self.state.block_elapsed_secs = 0;
        self.state.suppress_auto_log = manual_registration;
        self.state.key += 1;

        Some(TimerEvent::FocusStarted {
            item_id: self.state.associated_item_id.clone().unwrap_or_default(),
            item_kind,
            task_index,
            duration_secs: duration,
            is_custom_duration: is_custom,
            at: Utc::now(),
        })
    }

    /// Advance the timer by one second.
    ///
    /// No-op while idle or paused. The remaining time floors at zero, and
    /// the expiry transition fires exactly once: reaching zero immediately
    /// reloads the next segment or changes status.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        match self.state.status {
            PomodoroStatus::Focus => {
                self.state.time_remaining_secs = self.state.time_remaining_secs.saturating_sub(1);
                if self.state.time_remaining_secs > 0 {
                    return Vec::new();
                }
                self.on_focus_segment_expired(None)
            }
            PomodoroStatus::ShortBreak | PomodoroStatus::LongBreak => {
                self.state.time_remaining_secs = self.state.time_remaining_secs.saturating_sub(1);
                if self.state.time_remaining_secs > 0 {
                    return Vec::new();
                }
                self.begin_focus_from_tasks()
            }
            _ => Vec::new(),
        }
    }

    /// End the current segment early.
    ///
    /// During focus, `reported_secs` overrides the computed effective time
    /// of the block (the explicit form of the skip-with-adjusted-duration
    /// command). During a break, skipping starts the next focus block.
    pub fn skip(&mut self, reported_secs: Option<u64>) -> Vec<TimerEvent> {
        match self.state.status {
            PomodoroStatus::Focus => self.finish_focus_block(reported_secs),
            PomodoroStatus::ShortBreak | PomodoroStatus::LongBreak => {
                self.begin_focus_from_tasks()
            }
            _ => Vec::new(),
        }
    }

    /// Freeze the timer. Pausing from idle is a no-op.
    pub fn pause(&mut self) -> Option<TimerEvent> {
        match self.state.status {
            PomodoroStatus::Focus | PomodoroStatus::ShortBreak | PomodoroStatus::LongBreak => {
                let previous = self.state.status;
                self.state.previous_status = Some(previous);
                self.state.status = PomodoroStatus::Paused;
                Some(TimerEvent::TimerPaused {
                    previous,
                    time_remaining_secs: self.state.time_remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Resume from pause, restoring the pre-pause status.
    pub fn resume(&mut self) -> Option<TimerEvent> {
        if self.state.status != PomodoroStatus::Paused {
            return None;
        }
        let restored = self.state.previous_status.take()?;
        self.state.status = restored;
        Some(TimerEvent::TimerResumed {
            status: restored,
            time_remaining_secs: self.state.time_remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause_or_resume(&mut self) -> Option<TimerEvent> {
        if self.state.status == PomodoroStatus::Paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Force idle, clearing the session. No log is created.
    pub fn stop(&mut self) -> Option<TimerEvent> {
        if self.state.status == PomodoroStatus::Idle {
            return None;
        }
        self.reset_to_idle();
        Some(TimerEvent::TimerStopped { at: Utc::now() })
    }

    /// Swap settings. Resets the timer to idle defaults only while idle;
    /// a running session keeps its loaded durations.
    pub fn update_settings(&mut self, settings: PomodoroSettings) {
        self.settings = settings;
        if self.state.status == PomodoroStatus::Idle {
            self.reset_to_idle();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reset_to_idle(&mut self) {
        let key = self.state.key + 1;
        self.state = PomodoroState {
            key,
            ..PomodoroState::default()
        };
    }

    /// A focus segment hit zero: chain to the next task, or finish the
    /// block.
    fn on_focus_segment_expired(&mut self, reported_secs: Option<u64>) -> Vec<TimerEvent> {
        if !self.state.is_custom_duration {
            if let Some(index) = self.state.current_task_index {
                if index + 1 < self.settings.tasks.len() {
                    let finished = self.state.original_duration_secs.unwrap_or(0);
                    self.state.block_elapsed_secs += finished;
                    let next = &self.settings.tasks[index + 1];
                    self.state.current_task_index = Some(index + 1);
                    self.state.time_remaining_secs = next.duration_secs;
                    self.state.original_duration_secs = Some(next.duration_secs);
                    self.state.key += 1;
                    return vec![TimerEvent::TaskAdvanced {
                        from_task: index,
                        to_task: index + 1,
                        duration_secs: next.duration_secs,
                        at: Utc::now(),
                    }];
                }
            }
        }
        self.finish_focus_block(reported_secs)
    }

    /// Complete the running focus block and enter a break.
    fn finish_focus_block(&mut self, reported_secs: Option<u64>) -> Vec<TimerEvent> {
        let segment_elapsed = self
            .state
            .original_duration_secs
            .unwrap_or(0)
            .saturating_sub(self.state.time_remaining_secs);
        let effective_secs =
            reported_secs.unwrap_or(self.state.block_elapsed_secs + segment_elapsed);

        let completed = TimerEvent::FocusCompleted {
            item_id: self.state.associated_item_id.clone().unwrap_or_default(),
            item_kind: self
                .state
                .associated_item_kind
                .unwrap_or(ItemKind::Subject),
            effective_secs,
            auto_log: !self.state.suppress_auto_log,
            at: Utc::now(),
        };
        // Suppression applies exactly once.
        self.state.suppress_auto_log = false;

        self.state.current_cycle += 1;
        let cycles = self.settings.cycles_until_long_break;
        let is_long = cycles > 0 && self.state.current_cycle % cycles == 0;
        let duration = if is_long {
            self.settings.long_break_secs
        } else {
            self.settings.short_break_secs
        };
        self.state.status = if is_long {
            PomodoroStatus::LongBreak
        } else {
            PomodoroStatus::ShortBreak
        };
        self.state.time_remaining_secs = duration;
        self.state.current_task_index = None;
        self.state.original_duration_secs = None;
        self.state.block_elapsed_secs = 0;
        self.state.key += 1;

        vec![
            completed,
            TimerEvent::BreakStarted {
                is_long,
                cycle: self.state.current_cycle,
                duration_secs: duration,
                at: Utc::now(),
            },
        ]
    }

    /// A break ended: reload the first task. An empty task list drops the
    /// session back to idle.
    fn begin_focus_from_tasks(&mut self) -> Vec<TimerEvent> {
        let Some(first) = self.settings.tasks.first() else {
            self.reset_to_idle();
            return Vec::new();
        };
        self.state.status = PomodoroStatus::Focus;
        self.state.time_remaining_secs = first.duration_secs;
        self.state.current_task_index = Some(0);
        self.state.is_custom_duration = false;
        self.state.original_duration_secs = Some(first.duration_secs);
        self.state.block_elapsed_secs = 0;
        self.state.key += 1;
        vec![TimerEvent::FocusStarted {
            item_id: self.state.associated_item_id.clone().unwrap_or_default(),
            item_kind: self
                .state
                .associated_item_kind
                .unwrap_or(ItemKind::Subject),
            task_index: Some(0),
            duration_secs: first.duration_secs,
            is_custom_duration: false,
            at: Utc::now(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PomodoroTask;

    fn settings(task_secs: &[u64], cycles: u32) -> PomodoroSettings {
        PomodoroSettings {
            tasks: task_secs
                .iter()
                .enumerate()
                .map(|(i, &secs)| PomodoroTask::new(format!("Task {i}"), secs))
                .collect(),
            short_break_secs: 20,
            long_break_secs: 60,
            cycles_until_long_break: cycles,
        }
    }

    fn tick_n(engine: &mut PomodoroEngine, n: u64) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        for _ in 0..n {
            events.extend(engine.tick());
        }
        events
    }

    fn start(engine: &mut PomodoroEngine) {
        engine
            .start_for_item("subject-1", ItemKind::Subject, None, false)
            .expect("engine should start");
    }

    #[test]
    fn start_requires_idle_and_a_task() {
        let mut engine = PomodoroEngine::new(settings(&[], 2));
        assert!(engine
            .start_for_item("s", ItemKind::Subject, None, false)
            .is_none());

        let mut engine = PomodoroEngine::new(settings(&[30], 2));
        start(&mut engine);
        assert_eq!(engine.status(), PomodoroStatus::Focus);
        assert!(engine
            .start_for_item("s", ItemKind::Subject, None, false)
            .is_none());
    }

    #[test]
    fn task_list_chains_without_break_then_breaks_once() {
        let mut engine = PomodoroEngine::new(settings(&[30, 10], 2));
        start(&mut engine);

        let events = tick_n(&mut engine, 30);
        assert!(matches!(events.as_slice(), [TimerEvent::TaskAdvanced { from_task: 0, to_task: 1, .. }]));
        assert_eq!(engine.status(), PomodoroStatus::Focus);
        assert_eq!(engine.state().current_task_index, Some(1));

        let events = tick_n(&mut engine, 10);
        assert_eq!(events.len(), 2);
        let TimerEvent::FocusCompleted { effective_secs, auto_log, .. } = &events[0] else {
            panic!("expected FocusCompleted, got {:?}", events[0]);
        };
        assert_eq!(*effective_secs, 40);
        assert!(*auto_log);
        let TimerEvent::BreakStarted { is_long, cycle, .. } = &events[1] else {
            panic!("expected BreakStarted, got {:?}", events[1]);
        };
        assert!(!*is_long);
        assert_eq!(*cycle, 1);
        assert_eq!(engine.status(), PomodoroStatus::ShortBreak);
    }

    #[test]
    fn second_cycle_earns_the_long_break() {
        let mut engine = PomodoroEngine::new(settings(&[30, 10], 2));
        start(&mut engine);
        tick_n(&mut engine, 40); // focus block 1
        tick_n(&mut engine, 20); // short break, reloads task 0
        assert_eq!(engine.status(), PomodoroStatus::Focus);
        assert_eq!(engine.state().current_task_index, Some(0));

        let events = tick_n(&mut engine, 40); // focus block 2
        assert!(events.iter().any(|e| matches!(
            e,
            TimerEvent::BreakStarted { is_long: true, cycle: 2, .. }
        )));
        assert_eq!(engine.status(), PomodoroStatus::LongBreak);
    }

    #[test]
    fn custom_duration_never_touches_the_task_list() {
        let mut engine = PomodoroEngine::new(settings(&[30, 10], 2));
        engine
            .start_for_item("subject-1", ItemKind::Subject, Some(300), false)
            .unwrap();
        assert!(engine.state().is_custom_duration);
        assert_eq!(engine.state().current_task_index, None);

        let events = tick_n(&mut engine, 300);
        assert_eq!(engine.state().current_task_index, None);
        let TimerEvent::FocusCompleted { effective_secs, .. } = &events[0] else {
            panic!("expected FocusCompleted");
        };
        assert_eq!(*effective_secs, 300);
        assert_eq!(engine.status(), PomodoroStatus::ShortBreak);
    }

    #[test]
    fn pause_freezes_and_resume_restores() {
        let mut engine = PomodoroEngine::new(settings(&[30], 4));
        start(&mut engine);
        tick_n(&mut engine, 5);
        let frozen = engine.state().time_remaining_secs;

        engine.pause().unwrap();
        assert_eq!(engine.status(), PomodoroStatus::Paused);
        // Ticks while paused change nothing.
        assert!(tick_n(&mut engine, 10).is_empty());
        assert_eq!(engine.state().time_remaining_secs, frozen);

        let event = engine.resume().unwrap();
        assert!(matches!(
            event,
            TimerEvent::TimerResumed { status: PomodoroStatus::Focus, .. }
        ));
        assert_eq!(engine.state().time_remaining_secs, frozen);
    }

    #[test]
    fn pause_from_idle_is_a_no_op() {
        let mut engine = PomodoroEngine::new(settings(&[30], 4));
        assert!(engine.pause().is_none());
        assert!(engine.pause_or_resume().is_none());
        assert_eq!(engine.status(), PomodoroStatus::Idle);
    }

    #[test]
    fn skip_override_takes_precedence_over_computed_time() {
        let mut engine = PomodoroEngine::new(settings(&[300], 4));
        start(&mut engine);
        tick_n(&mut engine, 120);
        let events = engine.skip(Some(90));
        let TimerEvent::FocusCompleted { effective_secs, .. } = &events[0] else {
            panic!("expected FocusCompleted");
        };
        assert_eq!(*effective_secs, 90);
    }

    #[test]
    fn skip_without_override_reports_elapsed() {
        let mut engine = PomodoroEngine::new(settings(&[300], 4));
        start(&mut engine);
        tick_n(&mut engine, 120);
        let events = engine.skip(None);
        let TimerEvent::FocusCompleted { effective_secs, .. } = &events[0] else {
            panic!("expected FocusCompleted");
        };
        assert_eq!(*effective_secs, 120);
    }

    #[test]
    fn manual_registration_suppresses_exactly_once() {
        let mut engine = PomodoroEngine::new(settings(&[10], 4));
        engine
            .start_for_item("subject-1", ItemKind::Subject, None, true)
            .unwrap();
        let events = tick_n(&mut engine, 10);
        assert!(matches!(
            events[0],
            TimerEvent::FocusCompleted { auto_log: false, .. }
        ));

        tick_n(&mut engine, 20); // break, back to focus
        let events = tick_n(&mut engine, 10);
        assert!(matches!(
            events[0],
            TimerEvent::FocusCompleted { auto_log: true, .. }
        ));
    }

    #[test]
    fn stop_clears_session_without_logging() {
        let mut engine = PomodoroEngine::new(settings(&[30], 4));
        start(&mut engine);
        tick_n(&mut engine, 40); // into the break, cycle 1
        let event = engine.stop().unwrap();
        assert!(matches!(event, TimerEvent::TimerStopped { .. }));
        let state = engine.state();
        assert_eq!(state.status, PomodoroStatus::Idle);
        assert_eq!(state.current_cycle, 0);
        assert!(state.associated_item_id.is_none());
        assert!(engine.stop().is_none());
    }

    #[test]
    fn settings_change_resets_only_while_idle() {
        let mut engine = PomodoroEngine::new(settings(&[30], 4));
        start(&mut engine);
        tick_n(&mut engine, 5);
        let remaining = engine.state().time_remaining_secs;
        engine.update_settings(settings(&[99], 4));
        assert_eq!(engine.status(), PomodoroStatus::Focus);
        assert_eq!(engine.state().time_remaining_secs, remaining);

        engine.stop();
        engine.update_settings(settings(&[50], 4));
        assert_eq!(engine.status(), PomodoroStatus::Idle);
        // Next start picks up the new first task.
        engine
            .start_for_item("s", ItemKind::Subject, None, false)
            .unwrap();
        assert_eq!(engine.state().time_remaining_secs, 50);
    }

    #[test]
    fn key_is_monotonic_across_reloads() {
        let mut engine = PomodoroEngine::new(settings(&[30, 10], 2));
        let mut last = engine.state().key;
        start(&mut engine);
        for _ in 0..200 {
            engine.tick();
            let key = engine.state().key;
            assert!(key >= last);
            last = key;
        }
    }
}
