//! Property tests over the reducer invariants.

use proptest::prelude::*;
use studyroom_core::store::reduce;
use studyroom_core::{Action, StoreState, Subject};

fn seeded_subject() -> (StoreState, String) {
    let subject = Subject::new("Prop", "#000000");
    let id = subject.id.clone();
    let state = reduce(StoreState::default(), Action::AddSubject { subject });
    (state, id)
}

proptest! {
    /// After any interleaving of adds and deletes, surviving topic orders
    /// are exactly 0..n-1 with relative order preserved.
    #[test]
    fn topic_orders_stay_dense(ops in proptest::collection::vec(any::<(bool, u8)>(), 0..40)) {
        let (mut state, sid) = seeded_subject();
        let mut next_name = 0u32;
        for (is_add, pick) in ops {
            if is_add {
                state = reduce(state, Action::AddTopic {
                    subject_id: sid.clone(),
                    name: format!("topic-{next_name}"),
                    id: None,
                });
                next_name += 1;
            } else {
                let topics = &state.subject(&sid).unwrap().topics;
                if !topics.is_empty() {
                    let victim = topics[pick as usize % topics.len()].id.clone();
                    state = reduce(state, Action::DeleteTopic {
                        subject_id: sid.clone(),
                        topic_id: victim,
                    });
                }
            }
        }

        let topics = &state.subject(&sid).unwrap().topics;
        let orders: Vec<usize> = topics.iter().map(|t| t.order).collect();
        prop_assert_eq!(orders, (0..topics.len()).collect::<Vec<_>>());

        // Relative creation order survives: names are increasing.
        let names: Vec<u32> = topics
            .iter()
            .map(|t| t.name.trim_start_matches("topic-").parse().unwrap())
            .collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        prop_assert_eq!(names, sorted);
    }

    /// SET_REVISION_PROGRESS holds its invariant for any input, after any
    /// completion pattern.
    #[test]
    fn revision_progress_is_always_clamped(
        completed in proptest::collection::vec(any::<bool>(), 0..12),
        requested in any::<i64>(),
    ) {
        let (mut state, sid) = seeded_subject();
        for (i, done) in completed.iter().enumerate() {
            state = reduce(state, Action::AddTopic {
                subject_id: sid.clone(),
                name: format!("t{i}"),
                id: Some(format!("t{i}")),
            });
            if *done {
                state = reduce(state, Action::ToggleTopicCompleted {
                    subject_id: sid.clone(),
                    topic_id: format!("t{i}"),
                });
            }
        }
        state = reduce(state, Action::SetRevisionProgress {
            subject_id: sid.clone(),
            progress: requested,
        });

        let subject = state.subject(&sid).unwrap();
        let len = studyroom_core::revision::relevant_sequence(subject).len();
        prop_assert!(subject.revision_progress <= len);
    }

    /// The relevant sequence length never decreases as completion grows.
    #[test]
    fn relevant_sequence_growth_is_monotone(extra in 0usize..12) {
        let (mut state, sid) = seeded_subject();
        for i in 0..12usize {
            state = reduce(state, Action::AddTopic {
                subject_id: sid.clone(),
                name: format!("t{i}"),
                id: Some(format!("t{i}")),
            });
        }
        let mut last_len = 0;
        for i in 0..extra {
            state = reduce(state, Action::ToggleTopicCompleted {
                subject_id: sid.clone(),
                topic_id: format!("t{i}"),
            });
            let len = studyroom_core::revision::relevant_sequence(
                state.subject(&sid).unwrap(),
            )
            .len();
            prop_assert!(len >= last_len);
            last_len = len;
        }
    }
}
