//! Manual orphaned photo sweep

use std::sync::Arc;

use crate::config::Config;
use crate::scheduler::Scheduler;
use crate::state::SharedState;

pub async fn cmd_sweep_photos(config: Config) -> anyhow::Result<()> {
    let shared = SharedState::new(config).await?;
    let scheduler = Scheduler::new(
        Arc::clone(&shared.photo_sweeper),
        shared.config.uploads.clone(),
    );

    let report = scheduler.run_once().await?;

    println!(
        "Scanned {} files: removed {}, kept {} recent",
        report.scanned, report.removed, report.kept_recent
    );
    Ok(())
}
