//! # baseline - Read-only repository mirror
//!
//! `baseline` mirrors every repository of a GitHub organization (or user) or
//! a Bitbucket workspace into a local tree, `<root>/<owner>/<name>`, and
//! keeps that tree read-only so search and analysis tools cannot modify it.
//!
//! ## Features
//!
//! - **Discovery**: List repositories through the GitHub and Bitbucket REST APIs
//! - **Parallel Mirroring**: Clone or update many repositories with a fixed pool of workers
//! - **Write Protection**: Every mirrored tree is sealed read-only between runs
//! - **Cancellation**: Ctrl-C stops handing out work and lets in-flight repositories finish
//!
//! ## Quick Start
//!
//! ```bash
//! baseline init -d ./baseline
//! baseline clone -o acme --threads 8
//! baseline update -o acme
//! ```
//!
//! ## Architecture
//!
//! The crate is organized using clean architecture principles:
//!
//! - [`domain`]: Repository descriptors, outcomes and configuration
//! - [`application`]: The per-repository mirror and the sync engine
//! - [`infrastructure`]: `git`, permission sealing and platform APIs
//! - [`presentation`]: CLI interface and user interaction
//! - [`common`]: Shared error handling
//!
//! ## Examples
//!
//! ```rust,no_run
//! use baseline::application::services::RepositoryMirror;
//! use baseline::application::use_cases::{CancellationSignal, SyncEngine, SyncSummary};
//! use baseline::domain::entities::{RepositoryDescriptor, SyncMode};
//! use baseline::infrastructure::scm::GitScm;
//!
//! # async fn example() -> baseline::Result<()> {
//! let repos = vec![RepositoryDescriptor::new(
//!     "acme",
//!     "widgets",
//!     "https://github.com/acme/widgets.git",
//! )];
//!
//! let engine = SyncEngine::new(RepositoryMirror::new("./baseline", GitScm::new()), 4);
//! let mut outcomes = engine.run(repos, SyncMode::Clone, CancellationSignal::never());
//!
//! let mut summary = SyncSummary::new();
//! while let Some(outcome) = outcomes.recv().await {
//!     summary.record(&outcome);
//! }
//!
//! println!("cloned {} repositories", summary.cloned);
//! # Ok(())
//! # }
//! ```

// Documentation attributes
#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::BaselineError;
pub use crate::common::result::BaselineResult as Result;
