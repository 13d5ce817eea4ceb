use chrono::{DateTime, Local, TimeZone};

use crate::error::Result;
use crate::snapshot::CommitRecord;

use super::manager::GitManager;

impl GitManager {
    /// Walk history from HEAD, most recent first, bounded by `limit`.
    ///
    /// An unborn branch has no history and yields an empty list.
    pub fn head_commits(&self, limit: usize) -> Result<Vec<CommitRecord>> {
        if self.repo.head().is_err() {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;

        let mut records = Vec::with_capacity(limit.min(64));
        for oid in revwalk.take(limit) {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;

            let hex = oid.to_string();
            records.push(CommitRecord {
                short_id: hex[..7].to_string(),
                author: commit.author().name().unwrap_or("<unknown>").to_string(),
                committed_at: local_timestamp(commit.time().seconds()),
                message: commit.message().unwrap_or_default().trim_end().to_string(),
            });
        }

        Ok(records)
    }
}

fn local_timestamp(seconds: i64) -> DateTime<Local> {
    Local
        .timestamp_opt(seconds, 0)
        .single()
        .unwrap_or_else(|| DateTime::<Local>::from(std::time::UNIX_EPOCH))
}
