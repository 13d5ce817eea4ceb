//! Git repository operations for the session manager.
//!
//! Provides a high-level interface to libgit2 for the operations the session
//! exposes: initializing and opening repositories, staging and committing,
//! pushing, pulling and fetching, stashing, and reading bounded commit
//! history. Handles authentication via Git credential helpers and SSH agents.

mod branches;
mod credentials;
mod log;
mod manager;
mod operations;
mod remote;
mod stash;

// Re-export the main GitManager type
pub use manager::GitManager;
