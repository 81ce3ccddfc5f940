//! End-to-end tests driving the dispatcher, queue, worker, and storage
//! together.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use studyroom_core::{
    completion_log, Action, FlakyRemote, ItemKind, ManualClock, MemoryRemote, PomodoroEngine,
    PomodoroSettings, PomodoroTask, Store, StudySequence, StudySequenceItem, Subject,
    SyncDispatcher, SyncWorker, WriteQueue,
};

fn harness() -> (
    SyncDispatcher<ManualClock>,
    Arc<Mutex<WriteQueue<ManualClock>>>,
    ManualClock,
) {
    let clock = ManualClock::new(Utc::now());
    let queue = Arc::new(Mutex::new(WriteQueue::new(
        clock.clone(),
        Duration::seconds(1),
        3,
    )));
    (
        SyncDispatcher::new(Store::default(), queue.clone()),
        queue,
        clock,
    )
}

fn drain(queue: &Arc<Mutex<WriteQueue<ManualClock>>>, clock: &ManualClock) -> Vec<(studyroom_core::RemoteWrite, u32)> {
    clock.advance(Duration::seconds(5));
    queue.lock().unwrap().drain_ready(100)
}

#[tokio::test]
async fn mirror_documents_land_in_the_remote_after_flush() {
    let (mut dispatcher, queue, _clock) = harness();
    let remote = MemoryRemote::new();

    let subject = Subject::new("Anatomy", "#ef4444");
    let sid = subject.id.clone();
    dispatcher.dispatch(Action::AddSubject { subject });
    dispatcher.dispatch(Action::AddTopic {
        subject_id: sid.clone(),
        name: "Skeleton".into(),
        id: Some("t1".into()),
    });

    SyncWorker::flush(&queue, &remote).await;
    assert!(queue.lock().unwrap().is_empty());
    assert!(remote
        .doc(&studyroom_core::Collection::Subjects, &sid)
        .is_some());
    assert!(remote
        .doc(
            &studyroom_core::Collection::Topics { subject_id: sid },
            "t1"
        )
        .is_some());
}

#[tokio::test]
async fn remote_failure_never_rolls_back_local_state() {
    let (mut dispatcher, queue, _clock) = harness();
    // Every attempt fails.
    let remote = FlakyRemote::failing(u32::MAX);

    let subject = Subject::new("Anatomy", "#ef4444");
    let sid = subject.id.clone();
    dispatcher.dispatch(Action::AddSubject { subject });

    SyncWorker::flush(&queue, &remote).await;
    SyncWorker::flush(&queue, &remote).await;
    SyncWorker::flush(&queue, &remote).await;

    // Local state still has the subject; the write was retried then dropped.
    assert!(dispatcher.state().subject(&sid).is_some());
    assert!(queue.lock().unwrap().is_empty());
    assert_eq!(remote.inner.len(), 0);
}

#[tokio::test]
async fn transient_failures_retry_with_backoff_and_succeed() {
    let (mut dispatcher, queue, clock) = harness();
    let remote = FlakyRemote::failing(1);

    let subject = Subject::new("Anatomy", "#ef4444");
    let sid = subject.id.clone();
    dispatcher.dispatch(Action::AddSubject { subject });

    // First pass fails and requeues with backoff.
    clock.advance(Duration::seconds(5));
    SyncWorker::process_ready(&queue, &remote).await;
    assert_eq!(queue.lock().unwrap().len(), 1);
    assert!(remote.inner.is_empty());

    // After the backoff the retry lands.
    clock.advance(Duration::seconds(10));
    SyncWorker::process_ready(&queue, &remote).await;
    assert!(queue.lock().unwrap().is_empty());
    assert!(remote
        .doc(&studyroom_core::Collection::Subjects, &sid)
        .is_some());
}

#[test]
fn dispatch_order_is_preserved_in_local_state() {
    let (mut dispatcher, queue, clock) = harness();

    let mut subject = Subject::new("Math", "#3b82f6");
    subject.study_duration_min = Some(60);
    let sid = subject.id.clone();
    dispatcher.dispatch(Action::AddSubject { subject });
    dispatcher.dispatch(Action::SaveStudySequence {
        sequence: Some(StudySequence {
            id: "plan".into(),
            name: "Plan".into(),
            sequence: vec![StudySequenceItem::new(sid.clone())],
        }),
    });

    let mut entry = studyroom_core::StudyLogEntry::new(&sid, 55, Utc::now());
    entry.sequence_item_index = Some(0);
    dispatcher.dispatch(Action::AddStudyLog { entry });
    let mut entry = studyroom_core::StudyLogEntry::new(&sid, 10, Utc::now());
    entry.sequence_item_index = Some(0);
    dispatcher.dispatch(Action::AddStudyLog { entry });

    let state = dispatcher.state();
    assert_eq!(state.logs.len(), 2);
    assert_eq!(
        state.sequence.as_ref().unwrap().sequence[0].total_time_studied_min,
        65
    );
    assert_eq!(state.sequence_index, 1);

    // The queued mirror reflects the final coalesced documents.
    let writes = drain(&queue, &clock);
    assert!(writes
        .iter()
        .any(|(w, _)| w.key() == "sequences/current"));
}

#[test]
fn pomodoro_completion_feeds_the_sequence_tracker() {
    let (mut dispatcher, _queue, _clock) = harness();

    let mut subject = Subject::new("Math", "#3b82f6");
    subject.study_duration_min = Some(5);
    let sid = subject.id.clone();
    dispatcher.dispatch(Action::AddSubject { subject });
    dispatcher.dispatch(Action::SaveStudySequence {
        sequence: Some(StudySequence {
            id: "plan".into(),
            name: "Plan".into(),
            sequence: vec![StudySequenceItem::new(sid.clone())],
        }),
    });

    let settings = PomodoroSettings {
        tasks: vec![PomodoroTask::new("Focus", 30)],
        short_break_secs: 10,
        long_break_secs: 30,
        cycles_until_long_break: 4,
    };
    dispatcher.dispatch(Action::UpdatePomodoroSettings {
        settings: settings.clone(),
    });

    let mut engine = PomodoroEngine::new(settings);
    engine
        .start_for_item(sid.clone(), ItemKind::Subject, Some(300), false)
        .unwrap();
    let mut completed = 0;
    for _ in 0..300 {
        for event in engine.tick() {
            if let Some(action) = completion_log(dispatcher.state(), &event) {
                dispatcher.dispatch(action);
                completed += 1;
            }
        }
    }

    assert_eq!(completed, 1);
    let state = dispatcher.state();
    assert_eq!(state.logs.len(), 1);
    assert_eq!(state.logs[0].duration_min, 5);
    assert_eq!(state.logs[0].sequence_item_index, Some(0));
    // The 5-minute goal was met by the 5-minute session.
    assert_eq!(state.sequence_index, 1);
}
