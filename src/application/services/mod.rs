pub mod repository_mirror;

pub use repository_mirror::RepositoryMirror;
