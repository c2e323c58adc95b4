use anyhow::Result;

use super::sync::run_sync;
use crate::domain::entities::{BaselineConfig, SyncMode};
use crate::presentation::ui::DisplayHelper;

/// Handler for the clone command
pub struct CloneCommand {
    pub config: BaselineConfig,
}

impl CloneCommand {
    pub fn new(config: BaselineConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, display: &DisplayHelper) -> Result<()> {
        let report = run_sync(&self.config, SyncMode::Clone, display).await?;
        let summary = &report.summary;

        display.success("Clone completed!");
        println!("  Cloned:          {}", summary.cloned);
        println!("  Already present: {}", summary.already_present);
        if summary.failed > 0 {
            println!("  Failed:          {}", summary.failed);
        }

        report.into_result(display)
    }
}
