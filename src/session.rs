use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::SessionPaths;
use crate::error::{Result, SessionError};
use crate::git::GitManager;
use crate::settings::Settings;
use crate::snapshot::StatusSnapshot;
use crate::state::SessionState;

/// The network-bound operations that run off the caller's thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOpKind {
    Push,
    Pull,
    Fetch,
}

impl fmt::Display for RemoteOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOpKind::Push => write!(f, "push"),
            RemoteOpKind::Pull => write!(f, "pull"),
            RemoteOpKind::Fetch => write!(f, "fetch"),
        }
    }
}

/// An in-flight remote operation.
///
/// The result is delivered twice: to the callback passed to
/// [`RepositorySession::remote_op`] on the worker thread, and to whoever
/// calls [`RemoteJob::wait`]. Tests use `wait` to make completion
/// deterministic.
pub struct RemoteJob {
    kind: RemoteOpKind,
    handle: thread::JoinHandle<Result<StatusSnapshot>>,
}

impl RemoteJob {
    pub fn kind(&self) -> RemoteOpKind {
        self.kind
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the worker completes and return its result
    pub fn wait(self) -> Result<StatusSnapshot> {
        self.handle.join().unwrap_or_else(|_| {
            Err(SessionError::CommandFailure(
                "remote operation worker panicked".to_string(),
            ))
        })
    }
}

/// Clears the single-flight flag when the worker exits, panics included
struct FlightGuard(Arc<AtomicBool>);

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Mediates all interaction with the underlying git library.
///
/// Owns at most one repository handle at a time. Every operation either
/// succeeds and returns a fresh [`StatusSnapshot`] or fails with a
/// classified [`SessionError`]; validation failures are raised before the
/// engine is touched and have no side effect. The last opened repository
/// and branch are persisted after each successful state-changing operation
/// and can be restored on the next launch.
///
/// Local operations block the caller. The remote operations (`push`,
/// `pull`, `fetch`) run on a worker thread, one at a time.
pub struct RepositorySession {
    paths: SessionPaths,
    settings: Settings,
    repo: Option<GitManager>,
    remote_in_flight: Arc<AtomicBool>,
}

impl RepositorySession {
    /// Create a session with no repository open.
    ///
    /// Settings are loaded immediately; a missing or malformed settings
    /// file falls back to defaults without failing construction.
    pub fn new(paths: SessionPaths) -> Self {
        let settings = Settings::load(&paths.settings_file);
        RepositorySession {
            paths,
            settings,
            repo: None,
            remote_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_open(&self) -> bool {
        self.repo.is_some()
    }

    /// Mutate settings and persist them to config.json
    pub fn update_settings(&mut self, apply: impl FnOnce(&mut Settings)) -> Result<()> {
        apply(&mut self.settings);
        self.settings
            .save(&self.paths.settings_file)
            .map_err(|e| SessionError::Io(std::io::Error::other(e)))
    }

    /// Open an existing repository, replacing any currently open handle
    pub fn open(&mut self, path: &Path) -> Result<StatusSnapshot> {
        let repo = GitManager::open(path)?;
        log::info!("Opened repository at {}", repo.path().display());

        self.repo = Some(repo);
        self.persist_session_state();
        self.snapshot()
    }

    /// Initialize a repository at `path` (idempotent for an existing one)
    /// and open it, replacing any currently open handle
    pub fn init(&mut self, path: &Path) -> Result<StatusSnapshot> {
        let repo = GitManager::init(path)?;
        log::info!("Initialized repository at {}", repo.path().display());

        self.repo = Some(repo);
        self.persist_session_state();
        self.snapshot()
    }

    /// Stage all working-tree changes and commit them with `message`.
    ///
    /// The message is trimmed; an empty result is rejected before anything
    /// is staged.
    pub fn commit(&mut self, message: &str) -> Result<StatusSnapshot> {
        let repo = self.repo.as_ref().ok_or(SessionError::NoRepositoryOpen)?;

        let message = message.trim();
        if message.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        repo.stage_all()?;
        repo.commit(message)?;
        log::info!("Created commit: {message}");

        self.persist_session_state();
        self.snapshot()
    }

    /// Start a push/pull/fetch on a worker thread.
    ///
    /// `NoRepositoryOpen` and `NoRemoteConfigured` are checked here,
    /// synchronously and side-effect free. At most one remote operation may
    /// be in flight; a second call fails with `OperationInProgress` until
    /// the first worker finishes.
    ///
    /// The worker opens its own handle to the repository, so the session's
    /// handle is never shared across threads. On success it re-saves the
    /// session state and hands a fresh snapshot to `on_complete`; on
    /// failure `on_complete` receives the classified error. The returned
    /// [`RemoteJob`] yields the same result from `wait()`.
    pub fn remote_op<F>(&mut self, kind: RemoteOpKind, on_complete: F) -> Result<RemoteJob>
    where
        F: FnOnce(&Result<StatusSnapshot>) + Send + 'static,
    {
        let repo = self.repo.as_ref().ok_or(SessionError::NoRepositoryOpen)?;

        let remote = repo.default_remote()?;
        let branch = repo.current_branch()?;
        let workdir = repo.path();
        let limit = self.settings.max_log_entries;
        let session_file = self.paths.session_file.clone();

        if self.remote_in_flight.swap(true, Ordering::SeqCst) {
            return Err(SessionError::OperationInProgress);
        }

        let guard = FlightGuard(Arc::clone(&self.remote_in_flight));

        log::info!("Starting {kind} against remote '{remote}'");

        let handle = thread::spawn(move || {
            let result = run_remote_op(kind, &workdir, &remote, branch.as_deref(), limit);

            if let Ok(snapshot) = &result {
                save_session_state(&session_file, &workdir, snapshot.active_branch.clone());
            }

            // Allow the next remote operation before the callback runs, so a
            // completion handler may immediately start another one.
            drop(guard);

            on_complete(&result);
            result
        });

        Ok(RemoteJob { kind, handle })
    }

    /// Stash the working tree. Stashing a clean tree fails the same way
    /// `git stash` reports "no local changes to save".
    pub fn stash(&mut self) -> Result<StatusSnapshot> {
        let repo = self.repo.as_mut().ok_or(SessionError::NoRepositoryOpen)?;

        repo.stash_save()?;
        log::info!("Stashed working-tree changes");

        self.persist_session_state();
        self.snapshot()
    }

    /// Apply the most recent stash, keeping it on the stash list
    pub fn apply_stash(&mut self) -> Result<StatusSnapshot> {
        let repo = self.repo.as_mut().ok_or(SessionError::NoRepositoryOpen)?;

        if repo.stash_count()? == 0 {
            return Err(SessionError::NoStashAvailable);
        }

        repo.stash_apply()?;
        log::info!("Applied most recent stash");

        self.persist_session_state();
        self.snapshot()
    }

    /// Apply the most recent stash and drop it from the stash list
    pub fn pop_stash(&mut self) -> Result<StatusSnapshot> {
        let repo = self.repo.as_mut().ok_or(SessionError::NoRepositoryOpen)?;

        if repo.stash_count()? == 0 {
            return Err(SessionError::NoStashAvailable);
        }

        repo.stash_pop()?;
        log::info!("Popped most recent stash");

        self.persist_session_state();
        self.snapshot()
    }

    /// Recompute the snapshot and re-save session state
    pub fn refresh(&mut self) -> Result<StatusSnapshot> {
        if self.repo.is_none() {
            return Err(SessionError::NoRepositoryOpen);
        }

        self.persist_session_state();
        self.snapshot()
    }

    /// Pure read: recompute the snapshot without persisting anything
    pub fn status(&self) -> Result<StatusSnapshot> {
        self.snapshot()
    }

    /// Write the current repository and branch to session.json
    pub fn save_session(&self) -> Result<()> {
        let state = match &self.repo {
            Some(repo) => SessionState {
                last_repo: Some(repo.path()),
                last_branch: repo.current_branch().ok().flatten(),
            },
            // No repository open: keep whatever was saved before
            None => SessionState::load(&self.paths.session_file),
        };

        state
            .save(&self.paths.session_file)
            .map_err(|e| SessionError::Io(std::io::Error::other(e)))
    }

    /// Reopen the repository recorded in session.json and check out its
    /// recorded branch.
    ///
    /// Returns `Ok(None)` when no session was saved. A saved path that no
    /// longer exists or is no longer a repository fails with the usual open
    /// errors; callers treat that as non-fatal and start with no repository
    /// open. A recorded branch that no longer exists locally is skipped,
    /// and a checkout failure is logged and skipped, never fatal.
    pub fn restore_session(&mut self) -> Result<Option<StatusSnapshot>> {
        let state = SessionState::load(&self.paths.session_file);

        let Some(last_repo) = state.last_repo else {
            return Ok(None);
        };

        self.open(&last_repo)?;

        if let (Some(branch), Some(repo)) = (state.last_branch, self.repo.as_ref()) {
            if repo.local_branch_exists(&branch)
                && repo.current_branch()?.as_deref() != Some(branch.as_str())
            {
                if let Err(e) = repo.checkout_branch(&branch) {
                    log::warn!("Could not check out saved branch '{branch}': {e}");
                }
            }
        }

        self.persist_session_state();
        self.snapshot().map(Some)
    }

    fn snapshot(&self) -> Result<StatusSnapshot> {
        let repo = self.repo.as_ref().ok_or(SessionError::NoRepositoryOpen)?;
        snapshot_of(repo, self.settings.max_log_entries)
    }

    /// Best-effort session persistence: a failed write must not fail the
    /// repository operation that triggered it.
    fn persist_session_state(&self) {
        if let Err(e) = self.save_session() {
            log::warn!("Failed to save session state: {e}");
        }
    }
}

fn snapshot_of(repo: &GitManager, limit: usize) -> Result<StatusSnapshot> {
    Ok(StatusSnapshot {
        active_branch: repo.current_branch()?,
        is_dirty: repo.is_dirty()?,
        head_commits: repo.head_commits(limit)?,
    })
}

fn run_remote_op(
    kind: RemoteOpKind,
    workdir: &Path,
    remote: &str,
    branch: Option<&str>,
    limit: usize,
) -> Result<StatusSnapshot> {
    let repo = GitManager::open(workdir)?;

    match kind {
        RemoteOpKind::Push => {
            let branch = branch.ok_or_else(|| {
                SessionError::CommandFailure("cannot push: no branch checked out".to_string())
            })?;
            repo.push(remote, branch)?;
        }
        RemoteOpKind::Pull => {
            let branch = branch.ok_or_else(|| {
                SessionError::CommandFailure("cannot pull: no branch checked out".to_string())
            })?;
            repo.pull(remote, branch)?;
        }
        RemoteOpKind::Fetch => {
            repo.fetch(remote, branch)?;
        }
    }

    snapshot_of(&repo, limit)
}

fn save_session_state(session_file: &Path, workdir: &Path, branch: Option<String>) {
    let state = SessionState {
        last_repo: Some(workdir.to_path_buf()),
        last_branch: branch,
    };
    if let Err(e) = state.save(session_file) {
        log::warn!("Failed to save session state: {e}");
    }
}
