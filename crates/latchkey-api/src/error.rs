use thiserror::Error;

/// Top-level error type for the `latchkey-api` crate.
///
/// Two failure families matter to callers: transport problems (network,
/// TLS, timeout -- retried by the periodic poller, not here) and API
/// rejections (non-2xx -- never retried automatically). `latchkey-core`
/// maps these into availability flags and user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// The token cannot be carried in an HTTP header.
    #[error("Invalid API token: {0}")]
    InvalidToken(String),

    /// HTTP transport error (DNS failure, connection reset, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-2xx response from the API. 401/403 mean the token was rejected,
    /// 404 means the smartlock id is unknown to the account.
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next poll cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if the credential was rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }
}
