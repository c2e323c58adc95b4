use crate::domain::value_objects::CloneProtocol;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One remote repository as reported by the hosting platform.
///
/// Descriptors are produced by discovery and are read-only afterwards; the
/// sync engine only ever borrows or clones them. `owner` + `name` decide the
/// mirror location `<root>/<owner>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Repository name (last path segment on the platform)
    pub name: String,

    /// Owning organization, user or workspace
    pub owner: String,

    /// `owner/name` as the platform spells it
    pub full_name: String,

    /// HTTPS clone address
    pub clone_url: String,

    /// SSH clone address (may be empty when the platform offers none)
    #[serde(default)]
    pub ssh_url: String,

    /// Browser address of the repository
    #[serde(default)]
    pub html_url: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub private: bool,

    #[serde(default)]
    pub language: String,

    /// Last time the platform saw a change to the repository
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RepositoryDescriptor {
    /// Create a descriptor with only the fields the sync engine needs
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        clone_url: impl Into<String>,
    ) -> Self {
        let owner = owner.into();
        let name = name.into();
        Self {
            full_name: format!("{}/{}", owner, name),
            name,
            owner,
            clone_url: clone_url.into(),
            ssh_url: String::new(),
            html_url: String::new(),
            description: String::new(),
            private: false,
            language: String::new(),
            updated_at: None,
        }
    }

    pub fn with_ssh_url(mut self, ssh_url: impl Into<String>) -> Self {
        self.ssh_url = ssh_url.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Local mirror path of this repository below `root`
    pub fn local_path(&self, root: &Path) -> PathBuf {
        root.join(&self.owner).join(&self.name)
    }

    /// Clone address for the requested protocol.
    ///
    /// Falls back to the HTTPS address when no SSH address is known.
    pub fn clone_address(&self, protocol: CloneProtocol) -> &str {
        match protocol {
            CloneProtocol::Ssh if !self.ssh_url.is_empty() => &self.ssh_url,
            _ => &self.clone_url,
        }
    }
}

impl fmt::Display for RepositoryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

/// Drop later duplicates of the same `full_name`, keeping discovery order
pub fn dedup_by_full_name(repositories: Vec<RepositoryDescriptor>) -> Vec<RepositoryDescriptor> {
    let mut seen = std::collections::HashSet::new();
    repositories
        .into_iter()
        .filter(|repo| seen.insert(repo.full_name.clone()))
        .collect()
}
