use chrono::Utc;
use clap::Subcommand;
use studyroom_core::stats::study_stats;

use crate::common::{print_json, AppContext};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Show study statistics
    Show,
}

pub async fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::open()?;
    match action {
        StatsAction::Show => {
            let stats = study_stats(ctx.state(), Utc::now().date_naive());
            print_json(&stats)?;
        }
    }
    ctx.finish().await
}
