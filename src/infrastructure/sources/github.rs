use super::source_interface::{build_client, fetch_body, RepositorySource, SourceError};
use crate::domain::entities::{repository::dedup_by_full_name, RepositoryDescriptor};
use crate::domain::value_objects::SourceType;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use url::Url;

const PER_PAGE: usize = 100;

/// Repository object of the GitHub REST API (only the fields we use)
#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    full_name: String,
    clone_url: String,
    #[serde(default)]
    ssh_url: String,
    #[serde(default)]
    html_url: String,
    description: Option<String>,
    #[serde(default)]
    private: bool,
    updated_at: Option<DateTime<Utc>>,
    language: Option<String>,
    owner: GitHubOwner,
}

#[derive(Debug, Deserialize)]
struct GitHubOwner {
    login: String,
}

impl From<GitHubRepository> for RepositoryDescriptor {
    fn from(repo: GitHubRepository) -> Self {
        Self {
            name: repo.name,
            owner: repo.owner.login,
            full_name: repo.full_name,
            clone_url: repo.clone_url,
            ssh_url: repo.ssh_url,
            html_url: repo.html_url,
            description: repo.description.unwrap_or_default(),
            private: repo.private,
            language: repo.language.unwrap_or_default(),
            updated_at: repo.updated_at,
        }
    }
}

/// Which listing endpoint answers for an owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OwnerKind {
    Organization,
    User,
}

impl OwnerKind {
    fn path_segment(&self) -> &'static str {
        match self {
            OwnerKind::Organization => "orgs",
            OwnerKind::User => "users",
        }
    }
}

/// GitHub repository discovery
pub struct GitHubSource {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubSource {
    pub fn new(token: Option<String>) -> Result<Self, SourceError> {
        Self::with_base_url(SourceType::GitHub.default_api_url(), token)
    }

    /// Point the client at another API root (GitHub Enterprise, tests)
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn page_url(
        &self,
        kind: OwnerKind,
        organization: &str,
        page: usize,
    ) -> Result<Url, SourceError> {
        let raw = format!("{}/{}/{}/repos", self.base_url, kind.path_segment(), organization);
        Url::parse_with_params(
            &raw,
            &[
                ("page", page.to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("sort", "updated".to_string()),
            ],
        )
        .map_err(|source| SourceError::InvalidUrl { url: raw, source })
    }

    async fn get(&self, url: &Url) -> Result<(reqwest::StatusCode, String), SourceError> {
        let mut request = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github.v3+json");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        fetch_body(request, url.as_str()).await
    }

    /// Fetch one page, resolving the owner kind on the first request
    async fn fetch_page(
        &self,
        kind: &mut Option<OwnerKind>,
        organization: &str,
        page: usize,
    ) -> Result<Vec<RepositoryDescriptor>, SourceError> {
        let mut current = kind.unwrap_or(OwnerKind::Organization);
        let mut url = self.page_url(current, organization, page)?;
        let (mut status, mut body) = self.get(&url).await?;

        if kind.is_none() && status == reqwest::StatusCode::NOT_FOUND {
            debug!("{} is not an organization, trying the user endpoint", organization);
            current = OwnerKind::User;
            url = self.page_url(current, organization, page)?;
            (status, body) = self.get(&url).await?;
        }

        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        *kind = Some(current);
        parse_repositories(&body, url.as_str())
    }
}

fn parse_repositories(body: &str, url: &str) -> Result<Vec<RepositoryDescriptor>, SourceError> {
    let repositories: Vec<GitHubRepository> =
        serde_json::from_str(body).map_err(|source| SourceError::DecodeFailed {
            url: url.to_string(),
            source,
        })?;

    Ok(repositories.into_iter().map(RepositoryDescriptor::from).collect())
}

#[async_trait]
impl RepositorySource for GitHubSource {
    fn name(&self) -> &str {
        "github"
    }

    async fn list_repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<RepositoryDescriptor>, SourceError> {
        let mut repositories = Vec::new();
        let mut kind = None;
        let mut page = 1;

        loop {
            let batch = self.fetch_page(&mut kind, organization, page).await?;
            let has_more = batch.len() == PER_PAGE;
            debug!("page {} of {}: {} repositories", page, organization, batch.len());
            repositories.extend(batch);

            if !has_more {
                break;
            }
            page += 1;
        }

        Ok(dedup_by_full_name(repositories))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"[
        {
            "name": "widgets",
            "full_name": "acme/widgets",
            "clone_url": "https://github.com/acme/widgets.git",
            "ssh_url": "git@github.com:acme/widgets.git",
            "html_url": "https://github.com/acme/widgets",
            "description": "Widget factory",
            "private": false,
            "updated_at": "2024-05-01T12:00:00Z",
            "language": "Rust",
            "owner": { "login": "acme" }
        },
        {
            "name": "gadgets",
            "full_name": "acme/gadgets",
            "clone_url": "https://github.com/acme/gadgets.git",
            "ssh_url": "git@github.com:acme/gadgets.git",
            "html_url": "https://github.com/acme/gadgets",
            "description": null,
            "private": true,
            "updated_at": null,
            "language": null,
            "owner": { "login": "acme" }
        }
    ]"#;

    #[test]
    fn test_parse_repositories() {
        let repos = parse_repositories(PAGE, "https://api.github.com/orgs/acme/repos").unwrap();
        assert_eq!(repos.len(), 2);

        let widgets = &repos[0];
        assert_eq!(widgets.owner, "acme");
        assert_eq!(widgets.name, "widgets");
        assert_eq!(widgets.ssh_url, "git@github.com:acme/widgets.git");
        assert_eq!(widgets.language, "Rust");
        assert!(widgets.updated_at.is_some());

        let gadgets = &repos[1];
        assert_eq!(gadgets.description, "");
        assert_eq!(gadgets.language, "");
        assert!(gadgets.private);
    }

    #[test]
    fn test_parse_rejects_error_payload() {
        let err = parse_repositories(r#"{"message": "Bad credentials"}"#, "u").unwrap_err();
        assert!(matches!(err, SourceError::DecodeFailed { .. }));
    }

    #[test]
    fn test_page_url() {
        let source = GitHubSource::with_base_url("https://ghe.example.com/api/v3/", None).unwrap();
        let url = source.page_url(OwnerKind::User, "jane", 3).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/users/jane/repos?page=3&per_page=100&sort=updated"
        );
    }
}
