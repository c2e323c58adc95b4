use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Display utilities for the CLI interface
pub struct DisplayHelper {
    pub use_color: bool,
}

impl DisplayHelper {
    /// Create a new DisplayHelper
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "✓".green().bold(), message);
        } else {
            println!("[SUCCESS] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "✗".red().bold(), message);
        } else {
            eprintln!("[ERROR] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "⚠".yellow().bold(), message);
        } else {
            println!("[WARNING] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "::".blue().bold(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    /// Format a repository name with appropriate styling
    pub fn format_repo(&self, repo: &str) -> String {
        if self.use_color {
            repo.cyan().bold().to_string()
        } else {
            repo.to_string()
        }
    }

    /// Format a file path with appropriate styling
    pub fn format_path(&self, path: &str) -> String {
        if self.use_color {
            path.cyan().to_string()
        } else {
            format!("'{}'", path)
        }
    }

    /// Progress bar for a run over `len` repositories
    pub fn create_progress_bar(&self, len: u64, message: &str) -> ProgressBar {
        let pb = if self.use_color {
            ProgressBar::new(len)
        } else {
            ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden())
        };

        if self.use_color {
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos:>5}/{len:5} {msg}",
            ) {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_message(message.to_string());
        }

        pb
    }

    /// Spinner for discovery, whose length is unknown up front
    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        let pb = if self.use_color {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        };

        if self.use_color {
            if let Ok(style) = ProgressStyle::default_spinner()
                .tick_strings(&["⠁", "⠂", "⠄", "⡀", "⢀", "⠠", "⠐", "⠈", "✓"])
                .template("{spinner:.green} {msg}")
            {
                pb.set_style(style);
            }
            pb.set_message(message.to_string());
            pb.enable_steady_tick(Duration::from_millis(120));
        }

        pb
    }
}
