//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and validation outcomes into user-facing errors with
//! actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use latchkey_core::{CoreError, SmartlockId};

/// Exit codes, one per failure family.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("No API token configured")]
    #[diagnostic(
        code(latchkey::no_credentials),
        help(
            "Set the LATCHKEY_API_TOKEN environment variable, pass --api-token,\n\
             or add api_token to {path}"
        )
    )]
    NoCredentials { path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(latchkey::invalid_config))]
    Validation { field: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("The API rejected the token")]
    #[diagnostic(
        code(latchkey::auth_failed),
        help("Generate a fresh Web API token in the vendor portal and update your config.")
    )]
    AuthFailed,

    // ── Setup probe ──────────────────────────────────────────────────

    #[error("No smartlocks found on this account")]
    #[diagnostic(
        code(latchkey::no_devices),
        help("The token works, but the account has no smartlocks paired to it.")
    )]
    NoDevices,

    // ── Resources ────────────────────────────────────────────────────

    #[error("Smartlock {id} not found")]
    #[diagnostic(code(latchkey::not_found))]
    NotFound { id: SmartlockId },

    // ── Transport ────────────────────────────────────────────────────

    #[error("Request timed out")]
    #[diagnostic(
        code(latchkey::timeout),
        help("The API did not answer within the timeout. Raise --timeout or retry.")
    )]
    Timeout,

    #[error("Could not reach the API")]
    #[diagnostic(
        code(latchkey::connection_failed),
        help("Check your network connection and the configured base URL.")
    )]
    ConnectionFailed {
        #[source]
        source: CoreError,
    },

    // ── Fallthrough ──────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(latchkey::api_error))]
    Core(CoreError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    /// Sort a core failure into the right user-facing family.
    fn from(e: CoreError) -> Self {
        if e.is_auth() {
            return Self::AuthFailed;
        }
        if let CoreError::LockNotFound { id } = e {
            return Self::NotFound { id };
        }
        if let CoreError::Api(ref api) = e {
            if api.is_not_found() {
                // The API reported an unknown smartlock id; the id itself
                // is in the request, not the response, so report generically.
                return Self::Core(e);
            }
            if let latchkey_core::ApiError::Transport(ref t) = *api {
                if t.is_timeout() {
                    return Self::Timeout;
                }
                return Self::ConnectionFailed { source: e };
            }
        }
        Self::Core(e)
    }
}
