use clap::Subcommand;
use studyroom_core::{completion_log, ItemKind, PomodoroEngine, ValidationError};

use crate::common::{print_json, resolve_subject, resolve_topic, AppContext};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the Pomodoro loop for a subject or topic (ctrl-c to stop)
    Run {
        /// Subject id or name
        subject: String,
        /// Topic id or name within the subject
        #[arg(long)]
        topic: Option<String>,
        /// Custom focus duration in minutes, bypassing the task list
        #[arg(long)]
        duration: Option<u64>,
        /// Skip the automatic study log for the first focus block
        #[arg(long)]
        manual_log: bool,
    },
    /// Print the configured Pomodoro settings and an idle state snapshot
    Status,
}

pub async fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run { subject, topic, duration, manual_log } => {
            run_loop(subject, topic, duration, manual_log).await
        }
        TimerAction::Status => {
            let ctx = AppContext::open()?;
            let engine = PomodoroEngine::new(ctx.state().settings.clone());
            print_json(&serde_json::json!({
                "settings": engine.settings(),
                "state": engine.state(),
            }))?;
            ctx.finish().await
        }
    }
}

async fn run_loop(
    subject: String,
    topic: Option<String>,
    duration_min: Option<u64>,
    manual_log: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if duration_min == Some(0) {
        return Err(Box::new(ValidationError::InvalidValue {
            field: "duration".into(),
            message: "must be positive".into(),
        }));
    }

    let mut ctx = AppContext::open()?;
    let subject_id = resolve_subject(ctx.state(), &subject)?;
    let (item_id, item_kind) = match topic {
        Some(topic) => (
            resolve_topic(ctx.state(), &subject_id, &topic)?,
            ItemKind::Topic,
        ),
        None => (subject_id, ItemKind::Subject),
    };

    let worker = ctx.spawn_worker();
    let mut engine = PomodoroEngine::new(ctx.state().settings.clone());
    let started = engine
        .start_for_item(
            item_id,
            item_kind,
            duration_min.map(|m| m * 60),
            manual_log,
        )
        .ok_or(ValidationError::Missing("task list or custom duration"))?;
    print_json(&started)?;

    let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    interval.tick().await; // The first tick completes immediately.

    loop {
        tokio::select! {
            _ = interval.tick() => {
                for event in engine.tick() {
                    print_json(&event)?;
                    if let Some(action) = completion_log(ctx.state(), &event) {
                        ctx.dispatch(action);
                    }
                }
                ctx.maybe_flush()?;
            }
            _ = tokio::signal::ctrl_c() => {
                if let Some(event) = engine.stop() {
                    print_json(&event)?;
                }
                break;
            }
        }
    }

    if let Some(worker) = worker {
        worker.abort();
    }
    ctx.finish().await
}
