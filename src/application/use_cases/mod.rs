pub mod sync_repositories;

pub use sync_repositories::{CancellationHandle, CancellationSignal, SyncEngine, SyncSummary};
