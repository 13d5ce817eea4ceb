use chrono::{DateTime, Local};
use serde::Serialize;

/// One commit as rendered in the history log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    /// Abbreviated commit id (7 hex characters)
    pub short_id: String,
    pub author: String,
    pub committed_at: DateTime<Local>,
    pub message: String,
}

/// Read-only view of the open repository, recomputed on every call
///
/// Never cached between calls: a snapshot always reflects the on-disk state
/// at the moment it was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    /// Current branch name; `None` when HEAD is detached
    pub active_branch: Option<String>,

    /// Whether a commit right now would pick up any changes
    pub is_dirty: bool,

    /// Most-recent-first commit log, bounded by `Settings::max_log_entries`
    pub head_commits: Vec<CommitRecord>,
}
