//! Test fixtures for creating test data
//!
//! Repository descriptors and real `git` remotes on the local file system.

use baseline::domain::entities::RepositoryDescriptor;
use std::fs;
use std::path::{Path, PathBuf};

use super::test_helpers::run_git;

/// Fixture for creating repository descriptors
pub struct RepositoryFixture;

impl RepositoryFixture {
    /// The `acme/widgets` repository used throughout the scenarios
    pub fn widgets() -> RepositoryDescriptor {
        RepositoryDescriptor::new("acme", "widgets", "https://example/acme/widgets")
    }

    /// `count` distinct repositories spread over two owners
    pub fn many(count: usize) -> Vec<RepositoryDescriptor> {
        (0..count)
            .map(|i| {
                let owner = if i % 2 == 0 { "acme" } else { "globex" };
                let name = format!("repo-{:03}", i);
                let url = format!("https://example/{}/{}", owner, name);
                RepositoryDescriptor::new(owner, name, url)
            })
            .collect()
    }
}

/// A non-bare repository that plays the remote side of a mirror
pub struct GitRemoteFixture {
    path: PathBuf,
    commits: usize,
}

impl GitRemoteFixture {
    /// Create a repository with one commit on `main` below `parent`
    pub fn create(parent: &Path, name: &str) -> Self {
        let path = parent.join(name);
        fs::create_dir_all(&path).unwrap();
        run_git(&path, &["-c", "init.defaultBranch=main", "init", "--quiet"]);

        let mut remote = Self { path, commits: 0 };
        remote.commit("initial commit");
        remote
    }

    /// `file://` URL, so clones copy objects instead of hard-linking them
    pub fn url(&self) -> String {
        format!("file://{}", self.path.display())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Descriptor for this remote under `owner`
    pub fn descriptor(&self, owner: &str, name: &str) -> RepositoryDescriptor {
        RepositoryDescriptor::new(owner, name, self.url())
    }

    /// Add a file and commit it
    pub fn commit(&mut self, message: &str) {
        self.commits += 1;
        let file = format!("file-{}.txt", self.commits);
        fs::write(self.path.join(file), format!("{}\n", message)).unwrap();
        self.commit_all(message);
    }

    /// Write an executable script at `name` and commit it
    #[cfg(unix)]
    pub fn commit_script(&mut self, name: &str, body: &str, message: &str) {
        use std::os::unix::fs::PermissionsExt;

        let script = self.path.join(name);
        fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        self.commits += 1;
        self.commit_all(message);
    }

    fn commit_all(&self, message: &str) {
        run_git(&self.path, &["add", "-A"]);
        run_git(
            &self.path,
            &[
                "-c",
                "user.name=Baseline Tests",
                "-c",
                "user.email=tests@example.com",
                "-c",
                "commit.gpgsign=false",
                "commit",
                "--quiet",
                "-m",
                message,
            ],
        );
    }

    pub fn head(&self) -> String {
        run_git(&self.path, &["rev-parse", "HEAD"])
    }
}
