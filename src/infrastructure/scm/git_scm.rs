use super::scm_interface::{ScmError, ScmOperations};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// `git` command-line implementation of SCM operations
pub struct GitScm {
    git_executable: String,
}

impl Default for GitScm {
    fn default() -> Self {
        Self {
            git_executable: "git".to_string(),
        }
    }
}

impl GitScm {
    /// Create a new Git SCM instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Git SCM instance with custom executable path
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            git_executable: executable.into(),
        }
    }

    /// Check if git executable is available
    pub async fn check_availability(&self) -> Result<(), ScmError> {
        let output = self.execute_git_command(&["--version"], None).await?;

        if !output.status.success() {
            return Err(ScmError::executable_not_found(&self.git_executable));
        }

        Ok(())
    }

    /// Execute a git command in the given directory
    async fn execute_git_command(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<std::process::Output, ScmError> {
        let mut cmd = Command::new(&self.git_executable);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // never block a worker on a credential prompt
            .env("GIT_TERMINAL_PROMPT", "0");

        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        debug!("running {} {}", self.git_executable, args.join(" "));

        cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound && working_dir.map_or(true, Path::exists) {
                ScmError::executable_not_found(&self.git_executable)
            } else {
                ScmError::from(e)
            }
        })
    }

    /// Execute a git command and check for success
    async fn execute_git_command_checked(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<String, ScmError> {
        let output = self.execute_git_command(args, working_dir).await?;

        if !output.status.success() {
            return Err(self.command_failed(args, &output));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn command_failed(&self, args: &[&str], output: &std::process::Output) -> ScmError {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let command = format!("{} {}", self.git_executable, args.join(" "));
        ScmError::command_failed(command, output.status.code().unwrap_or(-1), stderr.trim())
    }

    /// Whether the checked-out branch tracks a remote branch
    async fn has_upstream(&self, repo_path: &Path) -> Result<bool, ScmError> {
        let output = self
            .execute_git_command(
                &["rev-parse", "--verify", "--quiet", "@{upstream}"],
                Some(repo_path),
            )
            .await?;
        Ok(output.status.success())
    }
}

#[async_trait]
impl ScmOperations for GitScm {
    async fn clone_repository(&self, url: &str, dest_path: &Path) -> Result<(), ScmError> {
        let dest = dest_path.to_str().ok_or_else(|| ScmError::Internal {
            message: format!("destination path is not valid UTF-8: {}", dest_path.display()),
        })?;

        self.execute_git_command_checked(&["clone", "--quiet", url, dest], None)
            .await?;

        Ok(())
    }

    async fn sync_repository(&self, repo_path: &Path) -> Result<(), ScmError> {
        self.execute_git_command_checked(
            &["fetch", "--prune", "--quiet", "origin"],
            Some(repo_path),
        )
        .await?;

        // An empty remote or a detached HEAD has nothing to fast-forward to
        if self.has_upstream(repo_path).await? {
            self.execute_git_command_checked(
                &["merge", "--ff-only", "--quiet", "@{upstream}"],
                Some(repo_path),
            )
            .await?;
        }

        Ok(())
    }

    async fn get_current_revision(&self, repo_path: &Path) -> Result<Option<String>, ScmError> {
        let args = ["rev-parse", "--verify", "--quiet", "HEAD"];
        let output = self.execute_git_command(&args, Some(repo_path)).await?;

        if output.status.success() {
            let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
            return Ok(Some(revision).filter(|r| !r.is_empty()));
        }

        // --quiet exits with 1 and no output when HEAD does not resolve yet
        if output.status.code() == Some(1) && output.stderr.is_empty() {
            return Ok(None);
        }

        Err(self.command_failed(&args, &output))
    }
}
