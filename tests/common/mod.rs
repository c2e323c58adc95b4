//! Common test utilities and helpers
//!
//! Shared by the engine, git and CLI integration tests. Not every test
//! binary uses every helper.

#![allow(dead_code)]

pub mod assertion_helpers;
pub mod http_stub;
pub mod mock_services;
pub mod test_fixtures;
pub mod test_helpers;
