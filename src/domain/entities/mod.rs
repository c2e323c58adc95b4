pub mod baseline_config;
pub mod outcome;
pub mod repository;

pub use baseline_config::{BaselineConfig, Credentials};
pub use outcome::{MirrorError, OutcomeStatus, SyncMode, SyncOutcome};
pub use repository::RepositoryDescriptor;
