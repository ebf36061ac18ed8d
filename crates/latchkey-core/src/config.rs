//! Per-account connection configuration.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// How often the background task polls the collection endpoint.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Empirically observed mechanical settle time: a lock takes 1-3 seconds
/// to finish moving after the vendor accepts an action.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Configuration for one logical account connection.
///
/// Handed to [`Controller::new`](crate::Controller::new); immutable for
/// the controller's lifetime.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// API base URL. Points at the vendor cloud unless overridden for
    /// testing.
    pub base_url: Url,

    /// Bearer token for the account. Never logged.
    pub api_token: SecretString,

    /// Per-request HTTP timeout.
    pub timeout: Duration,

    /// Periodic poll interval. `Duration::ZERO` disables the background
    /// poll task (on-demand refresh only).
    pub refresh_interval: Duration,

    /// Wait between an accepted action and the final reconciling poll.
    pub settle_delay: Duration,
}

impl AccountConfig {
    /// Config with spec defaults, pointing at the vendor cloud.
    pub fn new(api_token: SecretString) -> Self {
        Self {
            base_url: Url::parse(latchkey_api::DEFAULT_BASE_URL)
                .expect("default base URL is valid"),
            api_token,
            timeout: latchkey_api::transport::DEFAULT_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}
