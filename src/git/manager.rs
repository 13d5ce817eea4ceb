use git2::Repository;
use std::path::{Path, PathBuf};

use crate::error::{Result, SessionError};

/// High-level handle to one on-disk git repository
pub struct GitManager {
    pub(super) repo: Repository,
}

impl GitManager {
    /// Open an existing repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SessionError::PathNotFound(path.to_path_buf()));
        }

        let repo = Repository::open(path)
            .map_err(|_| SessionError::NotARepository(path.to_path_buf()))?;

        Ok(GitManager { repo })
    }

    /// Initialize a new repository, creating the directory if needed.
    ///
    /// Re-initializing an existing repository succeeds and reuses it, which
    /// is libgit2's own behavior for `git init` on a live repository.
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        let repo = Repository::init(path)
            .map_err(|e| SessionError::Io(std::io::Error::other(e.message().to_string())))?;

        Ok(GitManager { repo })
    }

    /// Get the repository working-tree path
    pub fn path(&self) -> PathBuf {
        self.repo
            .workdir()
            .unwrap_or_else(|| self.repo.path())
            .to_path_buf()
    }

    /// Check if a remote exists
    pub fn has_remote(&self, name: &str) -> bool {
        self.repo.find_remote(name).is_ok()
    }
}
