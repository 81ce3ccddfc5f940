use clap::Subcommand;
use serde::Serialize;
use studyroom_core::{Action, StudySequence, StudySequenceItem};

use crate::common::{print_json, resolve_subject, AppContext};

#[derive(Subcommand)]
pub enum SequenceAction {
    /// Save the current study sequence (subjects in rotation order)
    Save {
        name: String,
        /// Subject ids or names, in rotation order
        #[arg(required = true)]
        subjects: Vec<String>,
        /// Reuse an existing plan id to edit it in place; omitting this
        /// creates a new plan with zeroed progress
        #[arg(long)]
        id: Option<String>,
    },
    /// Clear the current sequence
    Clear,
    /// Zero all accumulated time and reset the cursor
    Reset,
    /// Manually advance the cursor one step
    Advance,
    /// Show the sequence, cursor and per-item progress
    Status,
}

#[derive(Serialize)]
struct SequenceStatus<'a> {
    sequence: Option<&'a StudySequence>,
    sequence_index: usize,
}

pub async fn run(action: SequenceAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = AppContext::open()?;

    match action {
        SequenceAction::Save { name, subjects, id } => {
            let mut items = Vec::with_capacity(subjects.len());
            for ident in &subjects {
                let subject_id = resolve_subject(ctx.state(), ident)?;
                // Editing an existing plan carries each subject's
                // accumulated time over; the reducer zeroes new plans.
                let carried = ctx
                    .state()
                    .sequence
                    .as_ref()
                    .filter(|current| Some(&current.id) == id.as_ref())
                    .and_then(|current| {
                        current
                            .sequence
                            .iter()
                            .find(|item| item.subject_id == subject_id)
                            .map(|item| item.total_time_studied_min)
                    })
                    .unwrap_or(0);
                items.push(StudySequenceItem {
                    subject_id,
                    total_time_studied_min: carried,
                });
            }
            let sequence = match id {
                Some(id) => StudySequence { id, name, sequence: items },
                None => StudySequence::new(name, items),
            };
            ctx.dispatch(Action::SaveStudySequence {
                sequence: Some(sequence),
            });
            print_status(&ctx)?;
        }
        SequenceAction::Clear => {
            ctx.dispatch(Action::SaveStudySequence { sequence: None });
            print_status(&ctx)?;
        }
        SequenceAction::Reset => {
            ctx.dispatch(Action::ResetStudySequence);
            print_status(&ctx)?;
        }
        SequenceAction::Advance => {
            ctx.dispatch(Action::AdvanceSequence);
            print_status(&ctx)?;
        }
        SequenceAction::Status => {
            print_status(&ctx)?;
        }
    }

    ctx.finish().await
}

fn print_status(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&SequenceStatus {
        sequence: ctx.state().sequence.as_ref(),
        sequence_index: ctx.state().sequence_index,
    })
}
