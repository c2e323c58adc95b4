//! Repository mirroring workflows.
//!
//! [`services::RepositoryMirror`] handles one repository at a time;
//! [`use_cases::SyncEngine`] fans a whole descriptor list out over a pool
//! of workers.

pub mod services;
pub mod use_cases;
