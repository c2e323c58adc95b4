use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::common::result::ResultExt;
use crate::presentation::ui::DisplayHelper;

/// Create the baseline directory
pub struct InitCommand {
    /// Root of the baseline tree
    pub directory: PathBuf,
}

impl InitCommand {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Execute the init command
    pub async fn execute(&self, display: &DisplayHelper) -> Result<()> {
        let existed = self.directory.is_dir();

        fs::create_dir_all(&self.directory).with_filesystem_error(
            format!("Failed to create directory {}", self.directory.display()),
            Some(self.directory.clone()),
        )?;

        let location = display.format_path(&self.directory.display().to_string());
        if existed {
            display.info(&format!("Baseline directory already exists at {}", location));
        } else {
            display.success(&format!("Initialized baseline directory at {}", location));
        }

        println!();
        println!("Next steps:");
        println!("   1. Run 'baseline discover -o <organization>' to list repositories");
        println!("   2. Run 'baseline clone -o <organization>' to mirror them");
        println!("   3. Run 'baseline update -o <organization>' to keep them current");

        Ok(())
    }
}
