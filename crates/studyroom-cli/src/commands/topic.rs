use clap::Subcommand;
use studyroom_core::store::TopicPatch;
use studyroom_core::Action;

use crate::common::{print_json, resolve_subject, resolve_topic, AppContext};

#[derive(Subcommand)]
pub enum TopicAction {
    /// Add a topic to a subject
    Add {
        /// Subject id or name
        subject: String,
        name: String,
    },
    /// Toggle a topic's completion
    Toggle {
        /// Subject id or name
        subject: String,
        /// Topic id or name
        topic: String,
    },
    /// Update a topic
    Update {
        /// Subject id or name
        subject: String,
        /// Topic id or name
        topic: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a topic (remaining topics are renumbered)
    Delete {
        /// Subject id or name
        subject: String,
        /// Topic id or name
        topic: String,
    },
}

pub async fn run(action: TopicAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = AppContext::open()?;

    match action {
        TopicAction::Add { subject, name } => {
            let subject_id = resolve_subject(ctx.state(), &subject)?;
            ctx.dispatch(Action::AddTopic {
                subject_id: subject_id.clone(),
                name,
                id: None,
            });
            print_json(&ctx.state().subject(&subject_id).expect("subject resolved").topics)?;
        }
        TopicAction::Toggle { subject, topic } => {
            let subject_id = resolve_subject(ctx.state(), &subject)?;
            let topic_id = resolve_topic(ctx.state(), &subject_id, &topic)?;
            ctx.dispatch(Action::ToggleTopicCompleted {
                subject_id: subject_id.clone(),
                topic_id: topic_id.clone(),
            });
            let subject = ctx.state().subject(&subject_id).expect("subject resolved");
            print_json(subject.topic(&topic_id).expect("topic resolved"))?;
        }
        TopicAction::Update { subject, topic, name, completed } => {
            let subject_id = resolve_subject(ctx.state(), &subject)?;
            let topic_id = resolve_topic(ctx.state(), &subject_id, &topic)?;
            ctx.dispatch(Action::UpdateTopic {
                subject_id: subject_id.clone(),
                topic_id: topic_id.clone(),
                data: TopicPatch {
                    name,
                    is_completed: completed,
                },
            });
            let subject = ctx.state().subject(&subject_id).expect("subject resolved");
            print_json(subject.topic(&topic_id).expect("topic resolved"))?;
        }
        TopicAction::Delete { subject, topic } => {
            let subject_id = resolve_subject(ctx.state(), &subject)?;
            let topic_id = resolve_topic(ctx.state(), &subject_id, &topic)?;
            ctx.dispatch(Action::DeleteTopic {
                subject_id: subject_id.clone(),
                topic_id,
            });
            print_json(&ctx.state().subject(&subject_id).expect("subject resolved").topics)?;
        }
    }

    ctx.finish().await
}
