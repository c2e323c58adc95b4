use crate::domain::entities::RepositoryDescriptor;
use async_trait::async_trait;
use std::time::Duration;

/// Timeout applied to every discovery request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A hosting platform that can enumerate the repositories of an owner
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Short platform name, e.g. `github`
    fn name(&self) -> &str;

    /// Every repository of `organization`, in platform order, one entry per
    /// repository. Any failure aborts the whole listing.
    async fn list_repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<RepositoryDescriptor>, SourceError>;
}

/// Errors that can occur while talking to a hosting platform
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuildFailed(#[source] reqwest::Error),

    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP status {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("failed to decode response from {url}: {source}")]
    DecodeFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub(crate) fn build_client() -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("baseline/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(SourceError::ClientBuildFailed)
}

/// Send a prepared request and return the body of a successful response
pub(crate) async fn fetch_body(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<(reqwest::StatusCode, String), SourceError> {
    let response = request.send().await.map_err(|source| SourceError::RequestFailed {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| SourceError::RequestFailed {
            url: url.to_string(),
            source,
        })?;

    Ok((status, body))
}
