use clap::Subcommand;
use serde::Serialize;
use studyroom_core::revision::{self, StepState};
use studyroom_core::Action;

use crate::common::{print_json, resolve_subject, AppContext};

#[derive(Subcommand)]
pub enum RevisionAction {
    /// Show a subject's revision schedule and cursor
    Show {
        /// Subject id or name
        subject: String,
    },
    /// Mark the current revision step done
    Done {
        /// Subject id or name
        subject: String,
    },
    /// Undo the most recently completed step
    Undo {
        /// Subject id or name
        subject: String,
    },
}

#[derive(Serialize)]
struct RevisionStep {
    index: usize,
    topic_id: String,
    topic_name: String,
    state: StepState,
}

#[derive(Serialize)]
struct RevisionView {
    subject_id: String,
    progress: usize,
    complete: bool,
    steps: Vec<RevisionStep>,
}

pub async fn run(action: RevisionAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = AppContext::open()?;

    match action {
        RevisionAction::Show { subject } => {
            let id = resolve_subject(ctx.state(), &subject)?;
            print_view(&ctx, &id)?;
        }
        RevisionAction::Done { subject } => {
            let id = resolve_subject(ctx.state(), &subject)?;
            let subject = ctx.state().subject(&id).expect("subject resolved");
            let progress = subject.revision_progress;
            if !revision::can_mark_done(subject, progress) {
                println!("{{\"advanced\": false}}");
            } else {
                ctx.dispatch(Action::SetRevisionProgress {
                    subject_id: id.clone(),
                    progress: progress as i64 + 1,
                });
            }
            print_view(&ctx, &id)?;
        }
        RevisionAction::Undo { subject } => {
            let id = resolve_subject(ctx.state(), &subject)?;
            let subject = ctx.state().subject(&id).expect("subject resolved");
            let progress = subject.revision_progress;
            if progress == 0 || !revision::can_undo(subject, progress - 1) {
                println!("{{\"undone\": false}}");
            } else {
                ctx.dispatch(Action::SetRevisionProgress {
                    subject_id: id.clone(),
                    progress: progress as i64 - 1,
                });
            }
            print_view(&ctx, &id)?;
        }
    }

    ctx.finish().await
}

fn print_view(ctx: &AppContext, subject_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let subject = ctx.state().subject(subject_id).expect("subject resolved");
    let steps = revision::relevant_sequence(subject)
        .iter()
        .enumerate()
        .map(|(index, topic)| RevisionStep {
            index,
            topic_id: topic.id.clone(),
            topic_name: topic.name.clone(),
            state: revision::step_state(subject.revision_progress, index),
        })
        .collect();
    print_json(&RevisionView {
        subject_id: subject.id.clone(),
        progress: subject.revision_progress,
        complete: revision::is_complete(subject),
        steps,
    })
}
