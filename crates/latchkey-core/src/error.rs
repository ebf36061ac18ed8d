use thiserror::Error;

use latchkey_api::types::SmartlockId;

/// Top-level error type for the `latchkey-core` crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Error from the API client (transport or HTTP).
    #[error(transparent)]
    Api(#[from] latchkey_api::Error),

    /// The requested lock is not in the current snapshot.
    #[error("smartlock {id} is not known to this account")]
    LockNotFound { id: SmartlockId },
}

impl CoreError {
    /// Returns `true` if the underlying failure was the credential
    /// being rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_auth())
    }

    /// Returns `true` for transient network failures.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_transient())
    }
}

/// Outcome of the credential validation probe, distinct per setup-flow
/// message. Anything that is neither an empty account nor a rejected
/// token is deliberately lumped into [`Unknown`](ValidationError::Unknown).
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The token works but the account has no smartlocks.
    #[error("no smartlocks found on this account")]
    NoLocksFound,

    /// The API rejected the token (HTTP 401/403).
    #[error("the API token was rejected")]
    InvalidCredential,

    /// Transport failure or any other unexpected error during the probe.
    #[error("validation failed: {0}")]
    Unknown(#[source] latchkey_api::Error),
}
