use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use tracing::warn;

use crate::application::services::RepositoryMirror;
use crate::application::use_cases::{CancellationSignal, SyncEngine, SyncSummary};
use crate::common::error::BaselineError;
use crate::common::result::ResultExt;
use crate::domain::entities::{BaselineConfig, OutcomeStatus, SyncMode, SyncOutcome};
use crate::infrastructure::scm::GitScm;
use crate::presentation::cli::commands::discover::discover_repositories;
use crate::presentation::ui::DisplayHelper;

/// What a clone or update run produced
#[derive(Debug)]
pub struct SyncReport {
    pub summary: SyncSummary,
    /// Number of repositories handed to the engine
    pub requested: usize,
    pub cancelled: bool,
}

impl SyncReport {
    /// Error for the CLI runner when the run must exit non-zero
    pub fn into_result(self, display: &DisplayHelper) -> Result<()> {
        for failure in &self.summary.failures {
            let message = failure
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string());
            display.error(&format!(
                "{}: {}",
                display.format_repo(&failure.repository.full_name),
                message
            ));
        }

        if self.cancelled {
            return Err(BaselineError::Cancelled {
                completed: self.summary.total(),
                requested: self.requested,
            }
            .into());
        }

        if self.summary.has_failures() {
            return Err(anyhow::anyhow!(
                "{} of {} repositories failed",
                self.summary.failed,
                self.requested
            ));
        }

        Ok(())
    }
}

/// Discover, then run the engine over every repository in `mode`
pub async fn run_sync(
    config: &BaselineConfig,
    mode: SyncMode,
    display: &DisplayHelper,
) -> Result<SyncReport> {
    config.require_organization()?;

    if mode == SyncMode::Clone {
        fs::create_dir_all(config.root()).with_filesystem_error(
            format!("Failed to create directory {}", config.root().display()),
            Some(config.root().to_path_buf()),
        )?;
    }

    let scm = GitScm::with_executable(&config.git_executable);
    scm.check_availability()
        .await
        .context("git is required to mirror repositories")?;

    let repositories = discover_repositories(config, display).await?;
    let requested = repositories.len();
    display.info(&format!(
        "{} {} repositories into {}",
        if mode == SyncMode::Clone { "Cloning" } else { "Updating" },
        requested,
        display.format_path(&config.root().display().to_string())
    ));

    let mirror = RepositoryMirror::new(config.root(), scm).with_protocol(config.protocol);
    let engine = SyncEngine::new(mirror, config.workers);

    // Ctrl-C only stops handing out new repositories
    let (handle, signal) = CancellationSignal::new();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, finishing in-flight repositories");
            handle.cancel();
        }
    });

    let mut outcomes = engine.run(repositories, mode, signal.clone());
    let pb = display.create_progress_bar(requested as u64, &mode.to_string());
    let mut summary = SyncSummary::new();

    while let Some(outcome) = outcomes.recv().await {
        summary.record(&outcome);
        pb.inc(1);
        if config.verbose {
            pb.suspend(|| print_outcome(&outcome, display));
        }
    }

    pb.finish_and_clear();
    interrupt.abort();

    Ok(SyncReport {
        summary,
        requested,
        cancelled: signal.is_cancelled(),
    })
}

fn print_outcome(outcome: &SyncOutcome, display: &DisplayHelper) {
    let name = display.format_repo(&outcome.repository.full_name);
    let elapsed = format!("({:.1}s)", outcome.duration.as_secs_f64());

    let label = match outcome.status() {
        OutcomeStatus::Cloned => "cloned".green(),
        OutcomeStatus::AlreadyPresent => "already present".dimmed(),
        OutcomeStatus::Updated => "updated".green(),
        OutcomeStatus::UpToDate => "up to date".dimmed(),
        OutcomeStatus::Skipped => "not present locally".yellow(),
        OutcomeStatus::Failed => "failed".red(),
    };

    println!("  {} {} {}", name, label, elapsed.dimmed());
}
