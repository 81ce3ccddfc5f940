use clap::Subcommand;
use studyroom_core::store::SubjectPatch;
use studyroom_core::{Action, Subject};

use crate::common::{print_json, resolve_subject, AppContext};

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Add a subject
    Add {
        name: String,
        /// Display color, #rrggbb
        #[arg(long, default_value = "#3b82f6")]
        color: String,
        /// Minutes of study that complete this subject's sequence slot
        #[arg(long)]
        study_duration: Option<u32>,
    },
    /// List all subjects as JSON
    List,
    /// Update a subject
    Update {
        /// Subject id or name
        subject: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// 0 clears the goal
        #[arg(long)]
        study_duration: Option<u32>,
    },
    /// Delete a subject
    Delete {
        /// Subject id or name
        subject: String,
    },
    /// Set the revision cursor (clamped into the valid range)
    SetRevision {
        /// Subject id or name
        subject: String,
        progress: i64,
    },
}

pub async fn run(action: SubjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = AppContext::open()?;

    match action {
        SubjectAction::Add { name, color, study_duration } => {
            let mut subject = Subject::new(name, color);
            subject.study_duration_min = study_duration.filter(|&d| d > 0);
            let id = subject.id.clone();
            ctx.dispatch(Action::AddSubject { subject });
            print_json(ctx.state().subject(&id).expect("just added"))?;
        }
        SubjectAction::List => {
            print_json(&ctx.state().subjects)?;
        }
        SubjectAction::Update { subject, name, color, study_duration } => {
            let id = resolve_subject(ctx.state(), &subject)?;
            ctx.dispatch(Action::UpdateSubject {
                id: id.clone(),
                data: SubjectPatch {
                    name,
                    color,
                    study_duration_min: study_duration,
                },
            });
            print_json(ctx.state().subject(&id).expect("updated in place"))?;
        }
        SubjectAction::Delete { subject } => {
            let id = resolve_subject(ctx.state(), &subject)?;
            ctx.dispatch(Action::DeleteSubject { id: id.clone() });
            println!("{{\"deleted\": \"{id}\"}}");
        }
        SubjectAction::SetRevision { subject, progress } => {
            let id = resolve_subject(ctx.state(), &subject)?;
            ctx.dispatch(Action::SetRevisionProgress {
                subject_id: id.clone(),
                progress,
            });
            print_json(ctx.state().subject(&id).expect("updated in place"))?;
        }
    }

    ctx.finish().await
}
