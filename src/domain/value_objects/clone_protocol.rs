use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of a repository's clone addresses to hand to the version-control tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneProtocol {
    /// `https://host/owner/name.git`
    Https,
    /// `git@host:owner/name.git`
    Ssh,
}

impl Default for CloneProtocol {
    fn default() -> Self {
        Self::Https
    }
}

impl fmt::Display for CloneProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloneProtocol::Https => write!(f, "https"),
            CloneProtocol::Ssh => write!(f, "ssh"),
        }
    }
}

impl FromStr for CloneProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "https" | "http" => Ok(CloneProtocol::Https),
            "ssh" | "git" => Ok(CloneProtocol::Ssh),
            other => Err(format!("unsupported clone protocol: '{}'", other)),
        }
    }
}

impl CloneProtocol {
    /// Pick the protocol from the `--ssh` preference flag
    pub fn from_ssh_preference(prefer_ssh: bool) -> Self {
        if prefer_ssh {
            CloneProtocol::Ssh
        } else {
            CloneProtocol::Https
        }
    }
}
