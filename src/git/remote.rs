use crate::error::{classify_remote_error, Result, SessionError};

use super::credentials;
use super::manager::GitManager;

impl GitManager {
    /// Pick the remote that push/pull/fetch should target: `origin` when
    /// configured, otherwise the first configured remote.
    pub fn default_remote(&self) -> Result<String> {
        let remotes = self.repo.remotes()?;

        if remotes.iter().flatten().any(|name| name == "origin") {
            return Ok("origin".to_string());
        }

        remotes
            .iter()
            .flatten()
            .next()
            .map(str::to_string)
            .ok_or(SessionError::NoRemoteConfigured)
    }

    /// Add a remote to the repository
    pub fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.repo.remote(name, url)?;
        Ok(())
    }

    /// Push the given branch to a remote
    pub fn push(&self, remote_name: &str, branch_name: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name)?;

        let refspec = format!("refs/heads/{branch_name}:refs/heads/{branch_name}");

        // Set up callbacks for authentication
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(credentials::credential_callback);

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote
            .push(&[&refspec], Some(&mut push_options))
            .map_err(|e| classify_remote_error(&e))?;

        Ok(())
    }

    /// Fetch from a remote. With a branch name only that branch is fetched,
    /// otherwise the remote's configured refspecs are used.
    pub fn fetch(&self, remote_name: &str, branch_name: Option<&str>) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name)?;

        // Set up callbacks for authentication
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(credentials::credential_callback);

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        let refspecs: Vec<&str> = branch_name.into_iter().collect();

        remote
            .fetch(&refspecs, Some(&mut fetch_options), None)
            .map_err(|e| classify_remote_error(&e))?;

        Ok(())
    }

    /// Pull from a remote: fetch the branch, then merge FETCH_HEAD.
    ///
    /// Only up-to-date and fast-forward results are handled; a divergence
    /// that needs a real merge is surfaced as a failure rather than
    /// attempted here.
    pub fn pull(&self, remote_name: &str, branch_name: &str) -> Result<()> {
        self.fetch(remote_name, Some(branch_name))?;

        let fetch_head = self.repo.find_reference("FETCH_HEAD")?;

        let fetch_commit = self.repo.reference_to_annotated_commit(&fetch_head)?;

        let analysis = self.repo.merge_analysis(&[&fetch_commit])?;

        if analysis.0.is_up_to_date() {
            return Ok(());
        } else if analysis.0.is_fast_forward() {
            let refname = format!("refs/heads/{branch_name}");
            let mut reference = self.repo.find_reference(&refname)?;

            reference.set_target(fetch_commit.id(), "Fast-forward merge")?;

            self.repo.set_head(&refname)?;

            self.repo
                .checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
        } else {
            return Err(SessionError::CommandFailure(
                "pull requires a merge; branches have diverged".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::test_support::init_repo_with_identity;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_remote_without_remotes() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        let result = git_manager.default_remote();
        assert!(matches!(result, Err(SessionError::NoRemoteConfigured)));
    }

    #[test]
    fn test_default_remote_prefers_origin() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        git_manager
            .add_remote("backup", "https://example.com/backup.git")
            .unwrap();
        git_manager
            .add_remote("origin", "https://example.com/repo.git")
            .unwrap();

        assert_eq!(git_manager.default_remote().unwrap(), "origin");
    }

    #[test]
    fn test_default_remote_falls_back_to_first() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        git_manager
            .add_remote("upstream", "https://example.com/upstream.git")
            .unwrap();

        assert_eq!(git_manager.default_remote().unwrap(), "upstream");
    }

    #[test]
    fn test_add_remote_and_has_remote() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        git_manager
            .add_remote("origin", "https://example.com/repo.git")
            .unwrap();

        assert!(git_manager.has_remote("origin"));
        assert!(!git_manager.has_remote("upstream"));
    }

    #[test]
    fn test_push_to_local_bare_remote() {
        let temp_dir = TempDir::new().unwrap();
        let bare_dir = TempDir::new().unwrap();
        git2::Repository::init_bare(bare_dir.path()).unwrap();

        let git_manager = init_repo_with_identity(temp_dir.path());
        fs::write(temp_dir.path().join("test.txt"), "content").unwrap();
        git_manager.stage_all().unwrap();
        git_manager.commit("Initial").unwrap();

        git_manager
            .add_remote("origin", bare_dir.path().to_str().unwrap())
            .unwrap();

        let branch = git_manager.current_branch().unwrap().unwrap();
        git_manager.push("origin", &branch).unwrap();

        // The bare remote now has the branch
        let bare = git2::Repository::open_bare(bare_dir.path()).unwrap();
        assert!(bare
            .find_reference(&format!("refs/heads/{branch}"))
            .is_ok());
    }

    #[test]
    fn test_pull_up_to_date_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let bare_dir = TempDir::new().unwrap();
        git2::Repository::init_bare(bare_dir.path()).unwrap();

        let git_manager = init_repo_with_identity(temp_dir.path());
        fs::write(temp_dir.path().join("test.txt"), "content").unwrap();
        git_manager.stage_all().unwrap();
        git_manager.commit("Initial").unwrap();

        git_manager
            .add_remote("origin", bare_dir.path().to_str().unwrap())
            .unwrap();

        let branch = git_manager.current_branch().unwrap().unwrap();
        git_manager.push("origin", &branch).unwrap();

        // Nothing new on the remote: pull is a no-op success
        git_manager.pull("origin", &branch).unwrap();
        assert_eq!(git_manager.history_length().unwrap(), 1);
    }
}
