/// Infrastructure layer modules
///
/// Concrete implementations for the systems the engine talks to:
/// - SCM operations (the `git` executable)
/// - File system permission sealing
/// - Repository discovery (GitHub, Bitbucket)
pub mod filesystem;
pub mod scm;
pub mod sources;

// Re-export commonly used types
pub use filesystem::{PermissionError, SealGuard};
pub use scm::{GitScm, ScmError, ScmOperations};
pub use sources::{RepositorySource, SourceError, SourceFactory};
