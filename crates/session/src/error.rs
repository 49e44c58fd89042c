//! Session error types.

use snapshot_store::StoreError;
use thiserror::Error;

/// Errors that can occur during session and registry operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No identity is logged in.
    #[error("no authenticated identity")]
    NotAuthenticated,

    /// The operation is only valid for artist identities.
    #[error("operation requires an artist identity")]
    NotAnArtist,

    /// Login failed.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Signup with an email that is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for session results.
pub type Result<T> = std::result::Result<T, SessionError>;
