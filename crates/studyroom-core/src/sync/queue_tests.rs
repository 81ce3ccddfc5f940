use std::path::PathBuf;

use chrono::{Duration, Utc};

use crate::clock::ManualClock;
use crate::sync::queue::WriteQueue;
use crate::sync::types::{Collection, RemoteWrite};

fn queue(clock: ManualClock) -> WriteQueue<ManualClock> {
    WriteQueue::new(clock, Duration::seconds(1), 4)
}

fn write(id: &str) -> RemoteWrite {
    RemoteWrite::upsert(Collection::Logs, id, serde_json::json!({"id": id}))
}

#[test]
fn nothing_is_ready_inside_the_debounce_window() {
    let clock = ManualClock::new(Utc::now());
    let mut queue = queue(clock.clone());
    queue.enqueue(write("a"));
    assert!(queue.drain_ready(10).is_empty());
    clock.advance(Duration::seconds(2));
    assert_eq!(queue.drain_ready(10).len(), 1);
    assert!(queue.is_empty());
}

#[test]
fn same_document_coalesces_to_latest_write() {
    let clock = ManualClock::new(Utc::now());
    let mut queue = queue(clock.clone());
    queue.enqueue(RemoteWrite::upsert(
        Collection::Logs,
        "a",
        serde_json::json!({"v": 1}),
    ));
    queue.enqueue(RemoteWrite::upsert(
        Collection::Logs,
        "a",
        serde_json::json!({"v": 2}),
    ));
    assert_eq!(queue.len(), 1);
    clock.advance(Duration::seconds(2));
    let drained = queue.drain_ready(10);
    let (w, _) = &drained[0];
    let crate::sync::types::WriteOp::Upsert { doc } = &w.op else {
        panic!("expected upsert");
    };
    assert_eq!(doc["v"], 2);
}

#[test]
fn drain_respects_the_limit() {
    let clock = ManualClock::new(Utc::now());
    let mut queue = queue(clock.clone());
    for i in 0..5 {
        queue.enqueue(write(&format!("doc-{i}")));
    }
    clock.advance(Duration::seconds(2));
    assert_eq!(queue.drain_ready(3).len(), 3);
    assert_eq!(queue.len(), 2);
}

#[test]
fn requeue_backs_off_and_caps_attempts() {
    let clock = ManualClock::new(Utc::now());
    let mut queue = queue(clock.clone());

    assert!(queue.requeue_failed(write("a"), 0));
    // Backoff doubles: attempt 1 waits 2s, not the base 1s.
    clock.advance(Duration::seconds(1));
    assert!(queue.drain_ready(10).is_empty());
    clock.advance(Duration::seconds(2));
    let drained = queue.drain_ready(10);
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].1, 1);

    // Cap: max_attempts is 4, so the fourth failure drops the write.
    assert!(!queue.requeue_failed(write("a"), 3));
    assert!(queue.is_empty());
}

#[test]
fn requeue_loses_to_a_newer_pending_write() {
    let clock = ManualClock::new(Utc::now());
    let mut queue = queue(clock.clone());
    let in_flight = write("a");
    queue.enqueue(write("a"));
    assert!(!queue.requeue_failed(in_flight, 0));
    assert_eq!(queue.len(), 1);
}

#[test]
fn time_until_next_batch_tracks_earliest_write() {
    let clock = ManualClock::new(Utc::now());
    let mut queue = queue(clock.clone());
    assert!(queue.time_until_next_batch().is_none());
    queue.enqueue(write("a"));
    assert_eq!(queue.time_until_next_batch(), Some(Duration::seconds(1)));
    clock.advance(Duration::seconds(5));
    assert_eq!(queue.time_until_next_batch(), Some(Duration::zero()));
}

#[test]
fn persists_and_loads_pending_writes() {
    let dir = tempfile::TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("queue.json");
    let clock = ManualClock::new(Utc::now());

    let mut queue = WriteQueue::new(clock.clone(), Duration::seconds(1), 4).with_queue_file(path.clone());
    queue.enqueue(write("a"));
    queue.persist().unwrap();

    let mut restored = WriteQueue::new(clock.clone(), Duration::seconds(1), 4).with_queue_file(path);
    restored.load().unwrap();
    assert_eq!(restored.len(), 1);
    clock.advance(Duration::seconds(2));
    assert_eq!(restored.drain_ready(10).len(), 1);
}

#[test]
fn drain_all_ignores_debounce() {
    let clock = ManualClock::new(Utc::now());
    let mut queue = queue(clock);
    queue.enqueue(write("a"));
    queue.enqueue(write("b"));
    assert_eq!(queue.drain_all().len(), 2);
    assert!(queue.is_empty());
}
