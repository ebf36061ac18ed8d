//! Async client for the Nuki Web API.
//!
//! Thin, stateless-per-call wrapper over the cloud REST endpoints at
//! `https://api.nuki.io`. Authentication is a bearer token injected as a
//! default header; every request carries a bounded timeout. The client
//! never retries internally -- retry policy belongs to the polling layer
//! in `latchkey-core`.
//!
//! Write operations (`lock`, `unlock`, `unlatch`, `lock_n_go`) are
//! fire-and-forget: a successful return means the vendor accepted the
//! command, not that the physical lock has finished moving.

pub mod error;
pub mod transport;
pub mod types;

mod client;

pub use client::WebApiClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{LockAction, Smartlock, SmartlockState};

/// Default base URL of the vendor cloud API.
pub const DEFAULT_BASE_URL: &str = "https://api.nuki.io";
