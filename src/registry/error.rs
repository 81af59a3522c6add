// Verification errors.
//
// Validation failures are the caller's fault and never touch the store.
// Storage failures carry the backend's full error chain for the operator
// log; the HTTP layer shows callers only a generic message.

use thiserror::Error;

/// Input rejected before any store access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tokenMint is required")]
    MissingTokenMint,

    #[error("unsupported platform: {0} (expected twitter, telegram or website)")]
    UnknownPlatform(String),
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store could not complete a lookup or insert. Claims committed
    /// earlier in the same request stay committed.
    #[error("registry storage failure: {0:#}")]
    Storage(anyhow::Error),
}
