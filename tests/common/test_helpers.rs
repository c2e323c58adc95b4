//! Test helper functions and utilities

use baseline::domain::entities::SyncOutcome;
use std::path::Path;
use std::process::Command;
use tokio::sync::mpsc;
use walkdir::WalkDir;

/// Whether a usable `git` is on the PATH
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Run git in `dir`, panicking on failure, and return trimmed stdout
pub fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("failed to spawn git");

    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Collect every outcome until the engine closes the stream
pub async fn drain(mut receiver: mpsc::Receiver<SyncOutcome>) -> Vec<SyncOutcome> {
    let mut outcomes = Vec::new();
    while let Some(outcome) = receiver.recv().await {
        outcomes.push(outcome);
    }
    outcomes
}

/// Relative paths of every entry below `root`, sorted
pub fn tree_listing(root: &Path) -> Vec<String> {
    let mut entries: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(|p| p.display().to_string())
        })
        .collect();
    entries.sort();
    entries
}
