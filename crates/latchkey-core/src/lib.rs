//! Reactive data layer between `latchkey-api` and host consumers.
//!
//! This crate owns the domain model and the polling/refresh coordination
//! for one smart-lock account connection:
//!
//! - **[`Controller`]** -- Central facade managing the lifecycle:
//!   [`connect()`](Controller::connect) performs an initial data refresh,
//!   then spawns a cancellable periodic poll task. Action methods
//!   (`lock`/`unlock`/`open`/`lock_n_go`) implement the
//!   action-then-settle protocol: awaited write, awaited immediate
//!   refresh, then one detached refresh after the mechanical settle delay.
//!
//! - **[`LockStore`]** -- Concurrent snapshot of all locks as of the last
//!   successful poll, with an availability flag that decouples "last poll
//!   succeeded" from data retention: a failed poll flips the flag but
//!   keeps the stale snapshot readable. Change notification via
//!   `tokio::sync::watch` subscriptions.
//!
//! - **Domain model** ([`model`]) -- [`LockState`] canonical states derived
//!   from vendor numeric codes via a fixed total mapping, plus the
//!   [`Lock`] type with its battery estimation heuristic.
//!
//! One `Controller` owns one API client, one store, and its background
//! tasks; there is no process-wide registry. Hosts hold the controller
//! and subscribe to the store.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::AccountConfig;
pub use controller::Controller;
pub use error::{CoreError, ValidationError};
pub use model::{Lock, LockState};
pub use store::LockStore;

pub use latchkey_api::Error as ApiError;
pub use latchkey_api::types::SmartlockId;
