/// Repository discovery against hosting platform APIs.
pub mod bitbucket;
pub mod github;
pub mod source_factory;
pub mod source_interface;

pub use bitbucket::BitbucketSource;
pub use github::GitHubSource;
pub use source_factory::SourceFactory;
pub use source_interface::{RepositorySource, SourceError};
