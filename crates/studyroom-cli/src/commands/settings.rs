use clap::Subcommand;
use studyroom_core::{Action, PomodoroTask, ValidationError};

use crate::common::{print_json, AppContext};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the Pomodoro settings
    Show,
    /// Update break durations and long-break cadence
    Set {
        #[arg(long)]
        short_break_secs: Option<u64>,
        #[arg(long)]
        long_break_secs: Option<u64>,
        #[arg(long)]
        cycles_until_long_break: Option<u32>,
    },
    /// Append a task to the focus task list
    AddTask {
        name: String,
        /// Task duration in minutes
        duration: u64,
    },
    /// Remove a task from the focus task list
    RemoveTask { id: String },
}

pub async fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = AppContext::open()?;

    match action {
        SettingsAction::Show => {
            print_json(&ctx.state().settings)?;
        }
        SettingsAction::Set {
            short_break_secs,
            long_break_secs,
            cycles_until_long_break,
        } => {
            let mut settings = ctx.state().settings.clone();
            if let Some(secs) = short_break_secs {
                settings.short_break_secs = secs;
            }
            if let Some(secs) = long_break_secs {
                settings.long_break_secs = secs;
            }
            if let Some(cycles) = cycles_until_long_break {
                settings.cycles_until_long_break = cycles;
            }
            ctx.dispatch(Action::UpdatePomodoroSettings { settings });
            print_json(&ctx.state().settings)?;
        }
        SettingsAction::AddTask { name, duration } => {
            if duration == 0 {
                return Err(Box::new(ValidationError::InvalidValue {
                    field: "duration".into(),
                    message: "must be positive".into(),
                }));
            }
            let mut settings = ctx.state().settings.clone();
            settings.tasks.push(PomodoroTask::new(name, duration * 60));
            ctx.dispatch(Action::UpdatePomodoroSettings { settings });
            print_json(&ctx.state().settings)?;
        }
        SettingsAction::RemoveTask { id } => {
            let mut settings = ctx.state().settings.clone();
            settings.tasks.retain(|t| t.id != id);
            ctx.dispatch(Action::UpdatePomodoroSettings { settings });
            print_json(&ctx.state().settings)?;
        }
    }

    ctx.finish().await
}
