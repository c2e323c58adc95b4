//! Data the mirror works on: repository descriptors, per-repository
//! outcomes, and the run configuration.

pub mod entities;
pub mod value_objects;
