use super::source_interface::{build_client, fetch_body, RepositorySource, SourceError};
use crate::domain::entities::{repository::dedup_by_full_name, RepositoryDescriptor};
use crate::domain::value_objects::SourceType;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use url::Url;

const PAGE_LENGTH: usize = 100;

#[derive(Debug, Deserialize)]
struct BitbucketPage {
    #[serde(default)]
    values: Vec<BitbucketRepository>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BitbucketRepository {
    name: String,
    slug: Option<String>,
    full_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_private: bool,
    updated_on: Option<DateTime<Utc>>,
    #[serde(default)]
    language: String,
    #[serde(default)]
    links: BitbucketLinks,
}

#[derive(Debug, Default, Deserialize)]
struct BitbucketLinks {
    #[serde(default)]
    clone: Vec<BitbucketCloneLink>,
    html: Option<BitbucketHref>,
}

#[derive(Debug, Deserialize)]
struct BitbucketCloneLink {
    name: String,
    href: String,
}

#[derive(Debug, Deserialize)]
struct BitbucketHref {
    href: String,
}

impl BitbucketLinks {
    fn clone_href(&self, protocol: &str) -> String {
        self.clone
            .iter()
            .find(|link| link.name.eq_ignore_ascii_case(protocol))
            .map(|link| link.href.clone())
            .unwrap_or_default()
    }
}

impl From<BitbucketRepository> for RepositoryDescriptor {
    fn from(repo: BitbucketRepository) -> Self {
        // full_name is "<workspace>/<slug>"; the slug is the path-safe name
        let (owner, slug) = match repo.full_name.split_once('/') {
            Some((owner, slug)) => (owner.to_string(), slug.to_string()),
            None => (String::new(), repo.full_name.clone()),
        };
        let name = repo.slug.unwrap_or(slug);
        let full_name = format!("{}/{}", owner, name);

        Self {
            clone_url: repo.links.clone_href("https"),
            ssh_url: repo.links.clone_href("ssh"),
            html_url: repo.links.html.map(|html| html.href).unwrap_or_default(),
            name,
            owner,
            full_name,
            description: repo.description,
            private: repo.is_private,
            language: repo.language,
            updated_at: repo.updated_on,
        }
    }
}

/// Bitbucket Cloud workspace discovery
pub struct BitbucketSource {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl BitbucketSource {
    pub fn new(credentials: Option<(String, String)>) -> Result<Self, SourceError> {
        Self::with_base_url(SourceType::Bitbucket.default_api_url(), credentials)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        credentials: Option<(String, String)>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn first_page_url(&self, workspace: &str) -> Result<Url, SourceError> {
        let raw = format!("{}/repositories/{}", self.base_url, workspace);
        Url::parse_with_params(
            &raw,
            &[("role", "member".to_string()), ("pagelen", PAGE_LENGTH.to_string())],
        )
        .map_err(|source| SourceError::InvalidUrl { url: raw, source })
    }

    async fn fetch_page(&self, url: &str) -> Result<BitbucketPage, SourceError> {
        let mut request = self.client.get(url);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let (status, body) = fetch_body(request, url).await?;
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        parse_page(&body, url)
    }
}

fn parse_page(body: &str, url: &str) -> Result<BitbucketPage, SourceError> {
    serde_json::from_str(body).map_err(|source| SourceError::DecodeFailed {
        url: url.to_string(),
        source,
    })
}

#[async_trait]
impl RepositorySource for BitbucketSource {
    fn name(&self) -> &str {
        "bitbucket"
    }

    async fn list_repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<RepositoryDescriptor>, SourceError> {
        let mut repositories = Vec::new();
        let mut next = Some(self.first_page_url(organization)?.to_string());

        while let Some(url) = next.take() {
            let page = self.fetch_page(&url).await?;
            debug!("{}: {} repositories", url, page.values.len());
            repositories.extend(page.values.into_iter().map(RepositoryDescriptor::from));

            next = page.next.filter(|candidate| candidate != &url);
        }

        Ok(dedup_by_full_name(repositories))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"{
        "pagelen": 100,
        "values": [
            {
                "name": "Widget Service",
                "slug": "widget-service",
                "full_name": "acme/widget-service",
                "description": "Serves widgets",
                "is_private": true,
                "updated_on": "2024-04-02T08:30:00.000000+00:00",
                "language": "go",
                "links": {
                    "clone": [
                        { "name": "https", "href": "https://bitbucket.org/acme/widget-service.git" },
                        { "name": "ssh", "href": "git@bitbucket.org:acme/widget-service.git" }
                    ],
                    "html": { "href": "https://bitbucket.org/acme/widget-service" }
                }
            }
        ],
        "next": "https://api.bitbucket.org/2.0/repositories/acme?role=member&pagelen=100&page=2"
    }"#;

    #[test]
    fn test_parse_page() {
        let page = parse_page(PAGE, "u").unwrap();
        assert_eq!(
            page.next.as_deref(),
            Some("https://api.bitbucket.org/2.0/repositories/acme?role=member&pagelen=100&page=2")
        );

        let repos: Vec<RepositoryDescriptor> =
            page.values.into_iter().map(RepositoryDescriptor::from).collect();
        assert_eq!(repos.len(), 1);

        let repo = &repos[0];
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "widget-service");
        assert_eq!(repo.full_name, "acme/widget-service");
        assert_eq!(repo.clone_url, "https://bitbucket.org/acme/widget-service.git");
        assert_eq!(repo.ssh_url, "git@bitbucket.org:acme/widget-service.git");
        assert_eq!(repo.html_url, "https://bitbucket.org/acme/widget-service");
        assert!(repo.private);
        assert!(repo.updated_at.is_some());
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page = parse_page(r#"{"values": []}"#, "u").unwrap();
        assert!(page.values.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn test_first_page_url() {
        let source = BitbucketSource::new(None).unwrap();
        assert_eq!(
            source.first_page_url("acme").unwrap().as_str(),
            "https://api.bitbucket.org/2.0/repositories/acme?role=member&pagelen=100"
        );
    }
}
