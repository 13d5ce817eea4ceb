//! # git-assistant
//!
//! A session manager for driving a local git repository through libgit2,
//! plus a small CLI front-end.
//!
//! ## Overview
//!
//! The core of the crate is [`session::RepositorySession`]: it owns at most
//! one open repository handle, exposes command-style operations (open,
//! init, commit, push/pull/fetch, stash, refresh), and remembers the last
//! opened repository and branch across process restarts. Every operation
//! either returns a fresh [`snapshot::StatusSnapshot`] or fails with a
//! classified [`error::SessionError`], so a front-end can branch on error
//! kinds instead of matching message strings.
//!
//! ## Key behaviors
//!
//! - **Validation before the engine**: missing repository, empty commit
//!   message, missing remote, and empty stash list are all rejected before
//!   libgit2 is invoked, with no side effect
//! - **Snapshots, never cached**: branch, dirty state, and bounded commit
//!   history are recomputed from disk on every call
//! - **Single-flight remote operations**: push/pull/fetch run on a worker
//!   thread, one at a time, with a joinable handle for deterministic tests
//! - **Forgiving persistence**: missing or malformed `config.json` /
//!   `session.json` fall back to defaults; a failed state write never fails
//!   the repository operation that triggered it

/// Platform-agnostic configuration directory management.
///
/// Locates the per-user configuration directory following platform
/// conventions (XDG on Linux, Application Support on macOS, AppData on
/// Windows) and the persisted files inside it.
pub mod config;

/// The classified error taxonomy for session operations, plus best-effort
/// classification of libgit2 transport errors into authentication, network,
/// and rejected-by-remote kinds.
pub mod error;

/// Git repository operations built on libgit2: open/init, staging and
/// committing, branches, remotes with credential-helper/SSH-agent auth,
/// stashing, and bounded history walks.
pub mod git;

/// Logging configuration: console output via `RUST_LOG` plus an append-only
/// log file in the config directory with size-based rotation.
pub mod logger;

/// The repository session manager. See [`session::RepositorySession`].
pub mod session;

/// User-facing settings persisted to `config.json`, with documented
/// defaults substituted for missing or malformed files.
pub mod settings;

/// Read-only status snapshots and commit records derived from the open
/// repository.
pub mod snapshot;

/// Last-session state persisted to `session.json` for restore-on-launch.
pub mod state;
