use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hosting platform the repository list is discovered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// github.com (organizations and users)
    GitHub,
    /// bitbucket.org (workspaces)
    Bitbucket,
}

impl Default for SourceType {
    fn default() -> Self {
        Self::GitHub
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::GitHub => write!(f, "github"),
            SourceType::Bitbucket => write!(f, "bitbucket"),
        }
    }
}

impl FromStr for SourceType {
    type Err = SourceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "github" | "gh" => Ok(SourceType::GitHub),
            "bitbucket" | "bb" => Ok(SourceType::Bitbucket),
            _ => Err(SourceTypeError::UnsupportedSource(s.to_string())),
        }
    }
}

impl SourceType {
    /// Default REST API endpoint for the platform
    pub fn default_api_url(&self) -> &'static str {
        match self {
            SourceType::GitHub => "https://api.github.com",
            SourceType::Bitbucket => "https://api.bitbucket.org/2.0",
        }
    }
}

/// Errors that can occur when parsing a source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceTypeError {
    /// The specified source is not supported
    UnsupportedSource(String),
}

impl fmt::Display for SourceTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTypeError::UnsupportedSource(source) => write!(
                f,
                "unsupported source: '{}' (supported: github, bitbucket)",
                source
            ),
        }
    }
}

impl std::error::Error for SourceTypeError {}
