use git2::IndexAddOption;

use crate::error::{Result, SessionError};

use super::manager::GitManager;

impl GitManager {
    /// Stage all working-tree changes: tracked modifications, new files,
    /// and deletions, the equivalent of `git add -A`.
    pub fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index()?;

        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;

        index.write()?;

        Ok(())
    }

    /// Create a commit from the staged index.
    ///
    /// A commit whose tree is identical to the HEAD tree is refused with
    /// "nothing to commit" so history length never changes silently. The
    /// first commit in an empty repository has no HEAD to compare against
    /// and is always allowed.
    pub fn commit(&self, message: &str) -> Result<()> {
        let mut index = self.repo.index()?;

        let tree_oid = index.write_tree()?;

        let parent_commit = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None, // First commit
        };

        if let Some(parent) = &parent_commit {
            if parent.tree_id() == tree_oid {
                return Err(SessionError::CommandFailure(
                    "nothing to commit, working tree clean".to_string(),
                ));
            }
        }

        let tree = self.repo.find_tree(tree_oid)?;

        // Uses user.name/user.email from git config; fails with libgit2's
        // diagnostic when the identity is not configured.
        let signature = self.repo.signature()?;

        let parents: Vec<_> = parent_commit.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;

        Ok(())
    }

    /// Check if the working tree has anything a commit would pick up.
    ///
    /// Counts staged changes, modifications and deletions of tracked files,
    /// and untracked (non-ignored) files, since `stage_all` stages all of
    /// those.
    pub fn is_dirty(&self) -> Result<bool> {
        let mut opts = git2::StatusOptions::new();

        opts.include_ignored(false);
        opts.include_untracked(true).recurse_untracked_dirs(true);
        opts.include_unmodified(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;

        for entry in statuses.iter() {
            let status = entry.status();
            if !status.is_empty() && !status.contains(git2::Status::IGNORED) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Number of commits reachable from HEAD (0 for an unborn branch)
    pub fn history_length(&self) -> Result<usize> {
        if self.repo.head().is_err() {
            return Ok(0);
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;

        let mut count = 0;
        for oid in revwalk {
            oid?;
            count += 1;
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::test_support::init_repo_with_identity;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_stage_all_empty_repository() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        let result = git_manager.stage_all();
        assert!(result.is_ok());
    }

    #[test]
    fn test_stage_all_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        fs::write(temp_dir.path().join("test.txt"), "content").unwrap();

        git_manager.stage_all().unwrap();

        assert!(git_manager.is_dirty().unwrap());
    }

    #[test]
    fn test_stage_all_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        let nested_dir = temp_dir.path().join("dir1").join("dir2").join("dir3");
        fs::create_dir_all(&nested_dir).unwrap();

        fs::write(temp_dir.path().join("root.txt"), "root").unwrap();
        fs::write(temp_dir.path().join("dir1").join("level1.txt"), "level1").unwrap();
        fs::write(nested_dir.join("deep.txt"), "deep").unwrap();

        git_manager.stage_all().unwrap();
        git_manager.commit("Add nested files").unwrap();

        assert!(!git_manager.is_dirty().unwrap());
    }

    #[test]
    fn test_commit_first_commit() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        fs::write(temp_dir.path().join("test.txt"), "content").unwrap();
        git_manager.stage_all().unwrap();

        git_manager.commit("First commit").unwrap();

        assert!(!git_manager.is_dirty().unwrap());
        assert_eq!(git_manager.history_length().unwrap(), 1);
    }

    #[test]
    fn test_commit_subsequent_commits() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        fs::write(temp_dir.path().join("file1.txt"), "content1").unwrap();
        git_manager.stage_all().unwrap();
        git_manager.commit("First commit").unwrap();

        fs::write(temp_dir.path().join("file2.txt"), "content2").unwrap();
        git_manager.stage_all().unwrap();
        git_manager.commit("Second commit").unwrap();

        assert_eq!(git_manager.history_length().unwrap(), 2);
        assert!(!git_manager.is_dirty().unwrap());
    }

    #[test]
    fn test_commit_with_nothing_staged_is_command_failure() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        fs::write(temp_dir.path().join("test.txt"), "content").unwrap();
        git_manager.stage_all().unwrap();
        git_manager.commit("Initial").unwrap();

        // Nothing changed since the last commit
        git_manager.stage_all().unwrap();
        let result = git_manager.commit("No-op");

        match result {
            Err(SessionError::CommandFailure(text)) => {
                assert!(text.contains("nothing to commit"))
            }
            other => panic!("expected CommandFailure, got {other:?}"),
        }
        assert_eq!(git_manager.history_length().unwrap(), 1);
    }

    #[test]
    fn test_commit_with_multiline_message() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        fs::write(temp_dir.path().join("test.txt"), "content").unwrap();
        git_manager.stage_all().unwrap();

        let message = "Title line\n\nDetailed description\nwith multiple lines";
        assert!(git_manager.commit(message).is_ok());
    }

    #[test]
    fn test_is_dirty_clean_repository() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        assert!(!git_manager.is_dirty().unwrap());
    }

    #[test]
    fn test_is_dirty_with_untracked_file() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        // Untracked files count: a commit would stage them
        fs::write(temp_dir.path().join("test.txt"), "content").unwrap();

        assert!(git_manager.is_dirty().unwrap());
    }

    #[test]
    fn test_is_dirty_with_modified_file() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        let file_path = temp_dir.path().join("test.txt");
        fs::write(&file_path, "original").unwrap();
        git_manager.stage_all().unwrap();
        git_manager.commit("Initial").unwrap();

        fs::write(&file_path, "modified").unwrap();

        assert!(git_manager.is_dirty().unwrap());
    }

    #[test]
    fn test_is_dirty_with_deleted_file() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        let file_path = temp_dir.path().join("test.txt");
        fs::write(&file_path, "content").unwrap();
        git_manager.stage_all().unwrap();
        git_manager.commit("Initial").unwrap();

        fs::remove_file(&file_path).unwrap();

        assert!(git_manager.is_dirty().unwrap());
    }

    #[test]
    fn test_history_length_empty_repository() {
        let temp_dir = TempDir::new().unwrap();
        let git_manager = init_repo_with_identity(temp_dir.path());

        assert_eq!(git_manager.history_length().unwrap(), 0);
    }
}
