use std::path::PathBuf;

use thiserror::Error;

/// Classified failures for session operations.
///
/// Validation variants (`NoRepositoryOpen`, `EmptyMessage`,
/// `NoRemoteConfigured`, `NoStashAvailable`, `OperationInProgress`) are
/// raised before libgit2 is touched and guarantee no side effect. Everything
/// the engine reports is either classified into one of the remote variants
/// or falls through to `CommandFailure` with the diagnostic text.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("No such path: {0}")]
    PathNotFound(PathBuf),

    #[error("No repository opened")]
    NoRepositoryOpen,

    #[error("Empty commit message")]
    EmptyMessage,

    #[error("No remote configured for this repository")]
    NoRemoteConfigured,

    #[error("No stash available")]
    NoStashAvailable,

    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Rejected by remote: {0}")]
    RemoteRejected(String),

    #[error("Another remote operation is already in progress")]
    OperationInProgress,

    #[error("Git command failed: {0}")]
    CommandFailure(String),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;

impl From<git2::Error> for SessionError {
    fn from(err: git2::Error) -> Self {
        SessionError::CommandFailure(err.message().to_string())
    }
}

/// Classify a libgit2 error raised during a push/pull/fetch.
///
/// libgit2 does not expose structured kinds for transport failures, so this
/// is best-effort matching on error class, code, and message text. The rules:
/// error class `Net`/`Ssl` means the transport broke; code `Auth`, class
/// `Ssh`, or an auth-ish/401/403 message means credentials were refused;
/// `NotFastForward` or a "rejected" message means the remote declined the
/// update. Anything unmatched is a plain `CommandFailure`.
pub fn classify_remote_error(err: &git2::Error) -> SessionError {
    use git2::{ErrorClass, ErrorCode};

    let text = err.message().to_string();
    let lowered = text.to_lowercase();

    if err.code() == ErrorCode::Auth
        || err.class() == ErrorClass::Ssh
        || lowered.contains("authentication")
        || lowered.contains("credential")
        || lowered.contains("401")
        || lowered.contains("403")
    {
        return SessionError::AuthenticationFailure(text);
    }

    if err.class() == ErrorClass::Net || err.class() == ErrorClass::Ssl {
        return SessionError::NetworkFailure(text);
    }

    if err.code() == ErrorCode::NotFastForward
        || lowered.contains("rejected")
        || lowered.contains("non-fast-forward")
    {
        return SessionError::RemoteRejected(text);
    }

    SessionError::CommandFailure(text)
}
