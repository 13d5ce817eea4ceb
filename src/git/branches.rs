use git2::{BranchType, ErrorCode};

use crate::error::Result;

use super::manager::GitManager;

impl GitManager {
    /// Get the current branch name.
    ///
    /// Returns `None` on a detached HEAD. An unborn branch (fresh `init`
    /// with no commits) still has a name, read from the symbolic HEAD
    /// reference.
    pub fn current_branch(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Ok(head) => {
                if self.repo.head_detached().unwrap_or(false) {
                    return Ok(None);
                }
                Ok(head.shorthand().map(str::to_string))
            }
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head_ref = self.repo.find_reference("HEAD")?;
                Ok(head_ref
                    .symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(str::to_string))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether a local branch with the given name exists
    pub fn local_branch_exists(&self, name: &str) -> bool {
        self.repo.find_branch(name, BranchType::Local).is_ok()
    }

    /// Check out an existing local branch
    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        let refname = format!("refs/heads/{name}");

        self.repo.set_head(&refname)?;

        self.repo
            .checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;

        Ok(())
    }
}
