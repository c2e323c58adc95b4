use super::repository::RepositoryDescriptor;
use crate::domain::value_objects::SealState;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Operation the sync engine applies to every descriptor of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncMode {
    /// Clone repositories that are not mirrored yet
    Clone,
    /// Fetch new history into repositories that are already mirrored
    Update,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Clone => write!(f, "clone"),
            SyncMode::Update => write!(f, "update"),
        }
    }
}

/// Per-repository failure conditions of the mirror.
///
/// `AlreadyExists` and `NotFound` are expected outcomes of re-running a
/// command and are not counted as failures; everything else is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    #[error("repository already exists at {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("repository does not exist at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to clone repository {repository}: {message}")]
    CloneFailed { repository: String, message: String },

    #[error("failed to update repository {repository}: {message}")]
    UpdateFailed { repository: String, message: String },

    #[error("failed to restore read-only permissions for {}: {message}", path.display())]
    PermissionRestoreFailed { path: PathBuf, message: String },
}

impl MirrorError {
    pub fn clone_failed(repository: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CloneFailed {
            repository: repository.into(),
            message: message.into(),
        }
    }

    pub fn update_failed(repository: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpdateFailed {
            repository: repository.into(),
            message: message.into(),
        }
    }

    pub fn permission_restore_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::PermissionRestoreFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for conditions that only mean "nothing to do"
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. } | Self::NotFound { .. })
    }
}

/// How a consumer should count an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeStatus {
    Cloned,
    AlreadyPresent,
    Updated,
    UpToDate,
    Skipped,
    Failed,
}

/// Result of one operation on one repository.
///
/// Exactly one outcome is emitted per descriptor of an uncancelled run.
/// Consumers correlate by `repository`, never by arrival order.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub repository: RepositoryDescriptor,
    pub mode: SyncMode,
    pub success: bool,
    /// Update only: the local revision pointer moved
    pub updated: bool,
    pub error: Option<MirrorError>,
    pub duration: Duration,
    /// Write-protection state the tree was left in; `None` when the tree was not touched
    pub seal: Option<SealState>,
}

impl SyncOutcome {
    pub fn succeeded(repository: RepositoryDescriptor, mode: SyncMode, duration: Duration) -> Self {
        Self {
            repository,
            mode,
            success: true,
            updated: false,
            error: None,
            duration,
            seal: Some(SealState::Sealed),
        }
    }

    pub fn failed(
        repository: RepositoryDescriptor,
        mode: SyncMode,
        error: MirrorError,
        duration: Duration,
    ) -> Self {
        Self {
            repository,
            mode,
            success: false,
            updated: false,
            error: Some(error),
            duration,
            seal: None,
        }
    }

    /// Update requested for a repository that is not mirrored locally
    pub fn skipped(repository: RepositoryDescriptor) -> Self {
        Self {
            repository,
            mode: SyncMode::Update,
            success: false,
            updated: false,
            error: None,
            duration: Duration::ZERO,
            seal: None,
        }
    }

    pub fn with_updated(mut self, updated: bool) -> Self {
        self.updated = updated;
        self
    }

    pub fn with_seal(mut self, seal: Option<SealState>) -> Self {
        self.seal = seal;
        self
    }

    pub fn status(&self) -> OutcomeStatus {
        match &self.error {
            Some(MirrorError::AlreadyExists { .. }) => OutcomeStatus::AlreadyPresent,
            Some(MirrorError::NotFound { .. }) => OutcomeStatus::Skipped,
            Some(_) => OutcomeStatus::Failed,
            None if !self.success => OutcomeStatus::Skipped,
            None => match self.mode {
                SyncMode::Clone => OutcomeStatus::Cloned,
                SyncMode::Update if self.updated => OutcomeStatus::Updated,
                SyncMode::Update => OutcomeStatus::UpToDate,
            },
        }
    }

    /// A genuine failure, as opposed to a skip or an already-present repository
    pub fn is_failure(&self) -> bool {
        self.status() == OutcomeStatus::Failed
    }
}
