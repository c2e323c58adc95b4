use anyhow::Result;

use super::sync::run_sync;
use crate::domain::entities::{BaselineConfig, SyncMode};
use crate::presentation::ui::DisplayHelper;

/// Handler for the update command
pub struct UpdateCommand {
    pub config: BaselineConfig,
}

impl UpdateCommand {
    pub fn new(config: BaselineConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, display: &DisplayHelper) -> Result<()> {
        let report = run_sync(&self.config, SyncMode::Update, display).await?;
        let summary = &report.summary;

        display.success("Update completed!");
        println!("  Updated:    {}", summary.updated);
        println!("  Up to date: {}", summary.up_to_date);
        if summary.skipped > 0 {
            display.warning(&format!(
                "{} repositories are not present locally (run 'baseline clone' first)",
                summary.skipped
            ));
        }
        if summary.failed > 0 {
            println!("  Failed:     {}", summary.failed);
        }

        report.into_result(display)
    }
}
