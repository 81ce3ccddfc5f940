use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "studyroom-cli", version, about = "Studyroom CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Subject management
    Subject {
        #[command(subcommand)]
        action: commands::subject::SubjectAction,
    },
    /// Topic management
    Topic {
        #[command(subcommand)]
        action: commands::topic::TopicAction,
    },
    /// Study log management
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Study sequence management
    Sequence {
        #[command(subcommand)]
        action: commands::sequence::SequenceAction,
    },
    /// Sequence template management
    Template {
        #[command(subcommand)]
        action: commands::template::TemplateAction,
    },
    /// Revision schedule
    Revision {
        #[command(subcommand)]
        action: commands::revision::RevisionAction,
    },
    /// Pomodoro timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Pomodoro settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Study statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Subject { action } => commands::subject::run(action).await,
        Commands::Topic { action } => commands::topic::run(action).await,
        Commands::Log { action } => commands::log::run(action).await,
        Commands::Sequence { action } => commands::sequence::run(action).await,
        Commands::Template { action } => commands::template::run(action).await,
        Commands::Revision { action } => commands::revision::run(action).await,
        Commands::Timer { action } => commands::timer::run(action).await,
        Commands::Settings { action } => commands::settings::run(action).await,
        Commands::Config { action } => commands::config::run(action).await,
        Commands::Stats { action } => commands::stats::run(action).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
