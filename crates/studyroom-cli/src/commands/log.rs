use chrono::{DateTime, Utc};
use clap::Subcommand;
use studyroom_core::store::StudyLogPatch;
use studyroom_core::{Action, StudyLogEntry};

use crate::common::{print_json, require_positive, resolve_subject, resolve_topic, AppContext};

#[derive(Subcommand)]
pub enum LogAction {
    /// Record a study log entry
    Add {
        /// Subject id or name
        subject: String,
        /// Duration in minutes
        duration: u32,
        /// Topic id or name
        #[arg(long)]
        topic: Option<String>,
        /// Entry date, RFC 3339 (defaults to now)
        #[arg(long)]
        date: Option<DateTime<Utc>>,
        #[arg(long)]
        start_page: Option<u32>,
        #[arg(long)]
        end_page: Option<u32>,
        #[arg(long)]
        questions_total: Option<u32>,
        #[arg(long)]
        questions_correct: Option<u32>,
        /// Sequence position to credit (defaults to the live cursor when
        /// it points at this subject)
        #[arg(long)]
        sequence_item: Option<usize>,
    },
    /// Edit a study log entry
    Update {
        id: String,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        date: Option<DateTime<Utc>>,
        #[arg(long)]
        start_page: Option<u32>,
        #[arg(long)]
        end_page: Option<u32>,
        #[arg(long)]
        questions_total: Option<u32>,
        #[arg(long)]
        questions_correct: Option<u32>,
    },
    /// Delete a study log entry
    Delete { id: String },
    /// List study log entries, optionally for one subject
    List {
        #[arg(long)]
        subject: Option<String>,
    },
}

pub async fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = AppContext::open()?;

    match action {
        LogAction::Add {
            subject,
            duration,
            topic,
            date,
            start_page,
            end_page,
            questions_total,
            questions_correct,
            sequence_item,
        } => {
            let duration = require_positive("duration", duration)?;
            let subject_id = resolve_subject(ctx.state(), &subject)?;
            let topic_id = topic
                .map(|t| resolve_topic(ctx.state(), &subject_id, &t))
                .transpose()?;

            let mut entry =
                StudyLogEntry::new(&subject_id, duration, date.unwrap_or_else(Utc::now));
            entry.topic_id = topic_id;
            entry.start_page = start_page;
            entry.end_page = end_page;
            entry.questions_total = questions_total;
            entry.questions_correct = questions_correct;
            entry.sequence_item_index = sequence_item.or_else(|| {
                // Default to the live cursor when it points at this subject.
                ctx.state().sequence.as_ref().and_then(|seq| {
                    seq.sequence
                        .get(ctx.state().sequence_index)
                        .filter(|item| item.subject_id == subject_id)
                        .map(|_| ctx.state().sequence_index)
                })
            });

            let id = entry.id.clone();
            ctx.dispatch(Action::AddStudyLog { entry });
            print_json(
                ctx.state()
                    .logs
                    .iter()
                    .find(|l| l.id == id)
                    .expect("just added"),
            )?;
        }
        LogAction::Update {
            id,
            duration,
            date,
            start_page,
            end_page,
            questions_total,
            questions_correct,
        } => {
            if let Some(d) = duration {
                require_positive("duration", d)?;
            }
            ctx.dispatch(Action::UpdateStudyLog {
                id: id.clone(),
                data: StudyLogPatch {
                    topic_id: None,
                    date,
                    duration_min: duration,
                    start_page,
                    end_page,
                    questions_total,
                    questions_correct,
                },
            });
            match ctx.state().logs.iter().find(|l| l.id == id) {
                Some(log) => print_json(log)?,
                None => println!("{{\"updated\": null}}"),
            }
        }
        LogAction::Delete { id } => {
            ctx.dispatch(Action::DeleteStudyLog { id: id.clone() });
            println!("{{\"deleted\": \"{id}\"}}");
        }
        LogAction::List { subject } => {
            let filter_id = subject
                .map(|s| resolve_subject(ctx.state(), &s))
                .transpose()?;
            let logs: Vec<_> = ctx
                .state()
                .logs
                .iter()
                .filter(|l| filter_id.as_deref().map_or(true, |id| l.subject_id == id))
                .collect();
            print_json(&logs)?;
        }
    }

    ctx.finish().await
}
