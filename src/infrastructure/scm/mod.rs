/// Version-control tool integration.
///
/// The mirror only depends on [`ScmOperations`]; [`git_scm::GitScm`]
/// drives the `git` executable.
pub mod git_scm;
pub mod scm_interface;

pub use git_scm::GitScm;
pub use scm_interface::{ScmError, ScmOperations};
