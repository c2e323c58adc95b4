use async_trait::async_trait;
use std::path::Path;

/// Operations the mirror needs from the external version-control tool.
///
/// Implementations act on exactly one working copy per call and hold no
/// per-repository state, so one instance is shared by every worker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScmOperations: Send + Sync {
    /// Clone `url` into `dest_path`, which must not exist yet
    async fn clone_repository(&self, url: &str, dest_path: &Path) -> Result<(), ScmError>;

    /// Bring an existing working copy up to date with its remote
    async fn sync_repository(&self, repo_path: &Path) -> Result<(), ScmError>;

    /// Current revision identifier, `None` while `HEAD` is unborn
    async fn get_current_revision(&self, repo_path: &Path) -> Result<Option<String>, ScmError>;
}

/// Errors that can occur during SCM operations
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("SCM executable not found: {executable}")]
    ExecutableNotFound { executable: String },

    #[error("Command execution failed: {command}, exit code: {exit_code}, stderr: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ScmError {
    /// Create an executable not found error
    pub fn executable_not_found(executable: impl Into<String>) -> Self {
        Self::ExecutableNotFound {
            executable: executable.into(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Diagnostic text suitable for a one-line report
    pub fn diagnostic(&self) -> String {
        match self {
            Self::CommandFailed { stderr, exit_code, .. } if !stderr.is_empty() => {
                format!("{} (exit code {})", stderr, exit_code)
            }
            other => other.to_string(),
        }
    }
}
