use crate::common::error::BaselineError;
use crate::common::result::BaselineResult;
use crate::domain::value_objects::{CloneProtocol, SourceType};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default number of repositories processed concurrently
pub const DEFAULT_WORKERS: usize = 4;

/// Default location of the baseline tree
pub const DEFAULT_DIRECTORY: &str = "./baseline";

/// Credentials for the hosting platform APIs
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub github_token: Option<String>,
    pub bitbucket_username: Option<String>,
    pub bitbucket_token: Option<String>,
}

impl Credentials {
    pub fn with_github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into()).filter(|t: &String| !t.is_empty());
        self
    }

    pub fn with_bitbucket(mut self, username: impl Into<String>, token: impl Into<String>) -> Self {
        self.bitbucket_username = Some(username.into()).filter(|u: &String| !u.is_empty());
        self.bitbucket_token = Some(token.into()).filter(|t: &String| !t.is_empty());
        self
    }

    /// Bitbucket basic-auth pair, only when both halves are present
    pub fn bitbucket_basic_auth(&self) -> Option<(&str, &str)> {
        match (&self.bitbucket_username, &self.bitbucket_token) {
            (Some(user), Some(token)) => Some((user.as_str(), token.as_str())),
            _ => None,
        }
    }
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "Some(***)"
    } else {
        "None"
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("github_token", &redact(&self.github_token))
            .field("bitbucket_username", &self.bitbucket_username)
            .field("bitbucket_token", &redact(&self.bitbucket_token))
            .finish()
    }
}

/// Everything a run needs, collected once from the command line and
/// environment and then passed down explicitly.
#[derive(Debug, Clone)]
pub struct BaselineConfig {
    /// Root of the baseline tree (`<directory>/<owner>/<name>`)
    pub directory: PathBuf,

    /// Organization, user or workspace to mirror
    pub organization: Option<String>,

    /// Platform the repository list comes from
    pub source: SourceType,

    pub credentials: Credentials,

    /// Number of concurrent workers (at least 1)
    pub workers: usize,

    pub verbose: bool,

    /// Which clone address to use
    pub protocol: CloneProtocol,

    /// Version-control executable to invoke
    pub git_executable: String,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            organization: None,
            source: SourceType::default(),
            credentials: Credentials::default(),
            workers: DEFAULT_WORKERS,
            verbose: false,
            protocol: CloneProtocol::default(),
            git_executable: "git".to_string(),
        }
    }
}

impl BaselineConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_source(mut self, source: SourceType) -> Self {
        self.source = source;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_protocol(mut self, protocol: CloneProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_git_executable(mut self, executable: impl Into<String>) -> Self {
        self.git_executable = executable.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.directory
    }

    /// Check the settings every command relies on
    pub fn validate(&self) -> BaselineResult<()> {
        if self.workers == 0 {
            return Err(BaselineError::validation_error(
                "threads",
                "must be at least 1",
                Some(self.workers.to_string()),
            ));
        }

        if self.directory.as_os_str().is_empty() {
            return Err(BaselineError::validation_error(
                "directory",
                "must not be empty",
                None,
            ));
        }

        if self.git_executable.trim().is_empty() {
            return Err(BaselineError::validation_error(
                "git_executable",
                "must not be empty",
                None,
            ));
        }

        Ok(())
    }

    /// Organization for commands that talk to the hosting platform
    pub fn require_organization(&self) -> BaselineResult<&str> {
        match self.organization.as_deref().map(str::trim) {
            Some(org) if !org.is_empty() => Ok(org),
            _ => Err(BaselineError::validation_error(
                "organization",
                "an organization or user is required (use --organization)",
                None,
            )),
        }
    }
}
