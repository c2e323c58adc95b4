//! Mock services for testing
//!
//! [`FakeScm`] stands in for the `git` executable. A "working copy" is a
//! directory holding `.fake-origin` (the clone URL) and `.fake-head` (the
//! checked-out revision); remotes are entries in an in-memory table.

use async_trait::async_trait;
use baseline::infrastructure::scm::{ScmError, ScmOperations};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ORIGIN_FILE: &str = ".fake-origin";
const HEAD_FILE: &str = ".fake-head";
const INITIAL_HEAD: &str = "0000001";

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScmCall {
    Clone { url: String, dest: PathBuf },
    Sync(PathBuf),
    Revision(PathBuf),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<ScmCall>,
    failing: HashSet<String>,
    remote_heads: HashMap<String, String>,
    in_flight: usize,
    max_in_flight: usize,
}

/// In-memory version-control tool
#[derive(Clone, Default)]
pub struct FakeScm {
    state: Arc<Mutex<FakeState>>,
    delay: Duration,
}

impl FakeScm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every clone/sync take at least `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Clones and syncs against `url` fail with a git-like diagnostic
    pub fn fail_on(&self, url: &str) {
        self.state.lock().unwrap().failing.insert(url.to_string());
    }

    /// Simulate a push to the remote at `url`
    pub fn set_remote_head(&self, url: &str, head: &str) {
        self.state
            .lock()
            .unwrap()
            .remote_heads
            .insert(url.to_string(), head.to_string());
    }

    pub fn calls(&self) -> Vec<ScmCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clone_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ScmCall::Clone { .. }))
            .count()
    }

    pub fn sync_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ScmCall::Sync(_)))
            .count()
    }

    /// Highest number of clone/sync calls that were running at once
    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }

    fn begin(&self, call: ScmCall) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state.in_flight += 1;
        state.max_in_flight = state.max_in_flight.max(state.in_flight);
    }

    fn end(&self) {
        self.state.lock().unwrap().in_flight -= 1;
    }

    fn is_failing(&self, url: &str) -> bool {
        self.state.lock().unwrap().failing.contains(url)
    }

    fn remote_head(&self, url: &str) -> String {
        self.state
            .lock()
            .unwrap()
            .remote_heads
            .get(url)
            .cloned()
            .unwrap_or_else(|| INITIAL_HEAD.to_string())
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl ScmOperations for FakeScm {
    async fn clone_repository(&self, url: &str, dest_path: &Path) -> Result<(), ScmError> {
        self.begin(ScmCall::Clone {
            url: url.to_string(),
            dest: dest_path.to_path_buf(),
        });
        self.pause().await;

        let result = if self.is_failing(url) {
            // leave a half-written tree behind, like an interrupted clone
            fs::create_dir_all(dest_path.join(".git"))?;
            Err(ScmError::command_failed(
                format!("git clone {}", url),
                128,
                format!("fatal: repository '{}' not found", url),
            ))
        } else {
            fs::create_dir_all(dest_path)?;
            fs::write(dest_path.join(ORIGIN_FILE), url)?;
            fs::write(dest_path.join(HEAD_FILE), self.remote_head(url))?;
            fs::write(dest_path.join("README.md"), "mirrored\n")?;
            Ok(())
        };

        self.end();
        result
    }

    async fn sync_repository(&self, repo_path: &Path) -> Result<(), ScmError> {
        self.begin(ScmCall::Sync(repo_path.to_path_buf()));
        self.pause().await;

        let url = fs::read_to_string(repo_path.join(ORIGIN_FILE))?;
        let result = if self.is_failing(&url) {
            Err(ScmError::command_failed(
                "git fetch --prune --quiet origin",
                128,
                "fatal: could not read from remote repository",
            ))
        } else {
            fs::write(repo_path.join(HEAD_FILE), self.remote_head(&url)).map_err(ScmError::from)
        };

        self.end();
        result
    }

    async fn get_current_revision(&self, repo_path: &Path) -> Result<Option<String>, ScmError> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(ScmCall::Revision(repo_path.to_path_buf()));

        match fs::read_to_string(repo_path.join(HEAD_FILE)) {
            Ok(head) => Ok(Some(head.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
