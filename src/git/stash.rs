use crate::error::Result;

use super::manager::GitManager;

impl GitManager {
    /// Stash the working tree and index.
    ///
    /// Like `git stash`, a clean working tree has nothing to set aside and
    /// libgit2 reports "nothing to stash"; that error is surfaced to the
    /// caller unchanged.
    pub fn stash_save(&mut self) -> Result<()> {
        let signature = self.repo.signature()?;

        self.repo
            .stash_save(&signature, "git-assistant stash", None)?;

        Ok(())
    }

    /// Apply the most recent stash, keeping it on the stash list
    pub fn stash_apply(&mut self) -> Result<()> {
        self.repo.stash_apply(0, None)?;
        Ok(())
    }

    /// Apply the most recent stash and drop it from the stash list
    pub fn stash_pop(&mut self) -> Result<()> {
        self.repo.stash_pop(0, None)?;
        Ok(())
    }

    /// Number of entries on the stash list
    pub fn stash_count(&mut self) -> Result<usize> {
        let mut count = 0;

        self.repo.stash_foreach(|_, _, _| {
            count += 1;
            true
        })?;

        Ok(count)
    }
}
