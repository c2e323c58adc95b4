use super::bitbucket::BitbucketSource;
use super::github::GitHubSource;
use super::source_interface::{RepositorySource, SourceError};
use crate::domain::entities::BaselineConfig;
use crate::domain::value_objects::SourceType;

/// Builds the discovery client selected by the configuration
pub struct SourceFactory;

impl SourceFactory {
    pub fn create(config: &BaselineConfig) -> Result<Box<dyn RepositorySource>, SourceError> {
        let credentials = &config.credentials;
        match config.source {
            SourceType::GitHub => Ok(Box::new(GitHubSource::new(
                credentials.github_token.clone(),
            )?)),
            SourceType::Bitbucket => {
                let auth = credentials
                    .bitbucket_basic_auth()
                    .map(|(user, token)| (user.to_string(), token.to_string()));
                Ok(Box::new(BitbucketSource::new(auth)?))
            }
        }
    }
}
