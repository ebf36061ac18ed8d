// ── Controller abstraction ──
//
// Lifecycle management for one smart-lock account connection: credential
// validation, initial + periodic polling, and the action-then-settle
// reconciliation protocol around fire-and-forget vendor actions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use latchkey_api::types::{Smartlock, SmartlockId};
use latchkey_api::{TransportConfig, WebApiClient};

use crate::config::AccountConfig;
use crate::convert;
use crate::error::{CoreError, ValidationError};
use crate::model::Lock;
use crate::store::LockStore;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc`. One instance owns one API client, one
/// [`LockStore`], and the background poll task for a logical account
/// connection -- hosts hold the controller, read the store, and subscribe
/// to its watch channels.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: AccountConfig,
    client: WebApiClient,
    store: Arc<LockStore>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Create a controller from configuration. Does NOT poll -- call
    /// [`connect()`](Self::connect) for the initial refresh and the
    /// background task, or use the read/action methods directly for
    /// one-shot invocations.
    pub fn new(config: AccountConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = WebApiClient::new(config.base_url.as_str(), &config.api_token, &transport)?;

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                store: Arc::new(LockStore::new()),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &AccountConfig {
        &self.inner.config
    }

    /// Access the snapshot store.
    pub fn store(&self) -> &Arc<LockStore> {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Perform the initial refresh, then spawn the periodic poll task.
    ///
    /// A failed initial refresh is fatal here; once connected, later
    /// poll failures only flip availability.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.refresh().await?;

        let period = self.inner.config.refresh_interval;
        if !period.is_zero() {
            let ctrl = self.clone();
            let cancel = self.inner.cancel.clone();
            let handle = tokio::spawn(refresh_task(ctrl, period, cancel));
            self.inner.task_handles.lock().await.push(handle);
        }

        info!(locks = self.inner.store.len(), "connected");
        Ok(())
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
    }

    // ── Refresh primitive ────────────────────────────────────────────

    /// Poll the collection endpoint once and apply the result.
    ///
    /// Shared by the periodic task, the post-action refreshes, and
    /// on-demand callers; all race harmlessly -- application is
    /// idempotent and last-write-wins. On failure the store is marked
    /// unavailable (prior data retained) and the error returned to the
    /// direct caller.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        match self.inner.client.list_smartlocks().await {
            Ok(raw) => {
                let locks: Vec<Lock> = raw.into_iter().map(convert::to_lock).collect();
                debug!(count = locks.len(), "refresh applied");
                self.inner.store.apply(locks);
                Ok(())
            }
            Err(e) => {
                self.inner.store.mark_failed();
                Err(e.into())
            }
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Read one lock from the current snapshot.
    pub fn get_lock(&self, id: SmartlockId) -> Result<Arc<Lock>, CoreError> {
        self.inner
            .store
            .get(id)
            .ok_or(CoreError::LockNotFound { id })
    }

    /// Fetch one lock straight from the API, bypassing the snapshot.
    ///
    /// Device-scoped read for diagnostics; does not touch the store or
    /// its availability flag.
    pub async fn fetch_lock(&self, id: SmartlockId) -> Result<Lock, CoreError> {
        let raw: Smartlock = self.inner.client.get_smartlock(id).await?;
        Ok(convert::to_lock(raw))
    }

    // ── Actions (action-then-settle protocol) ────────────────────────
    //
    // Each action: await the vendor write (failure propagates, nothing
    // scheduled), await one immediate refresh (may still show a
    // transient state), then schedule one detached refresh after the
    // mechanical settle delay. Whatever that final poll yields is pushed
    // to dependents as-is.

    /// Lock the device.
    pub async fn lock(&self, id: SmartlockId) -> Result<(), CoreError> {
        debug!(id, "locking");
        self.inner.client.lock(id).await?;
        self.reconcile().await;
        Ok(())
    }

    /// Unlock the device.
    pub async fn unlock(&self, id: SmartlockId) -> Result<(), CoreError> {
        debug!(id, "unlocking");
        self.inner.client.unlock(id).await?;
        self.reconcile().await;
        Ok(())
    }

    /// Open the door latch (maps to the vendor's unlatch action).
    pub async fn open(&self, id: SmartlockId) -> Result<(), CoreError> {
        debug!(id, "unlatching");
        self.inner.client.unlatch(id).await?;
        self.reconcile().await;
        Ok(())
    }

    /// Run the device-side lock'n'go sequence.
    pub async fn lock_n_go(&self, id: SmartlockId, unlatch: bool) -> Result<(), CoreError> {
        debug!(id, unlatch, "lock'n'go");
        self.inner.client.lock_n_go(id, unlatch).await?;
        self.reconcile().await;
        Ok(())
    }

    /// Post-action reconciliation: one awaited refresh now, one detached
    /// refresh after the settle delay. The settle refresh is scheduled
    /// whether or not the immediate refresh succeeded.
    async fn reconcile(&self) {
        if let Err(e) = self.refresh().await {
            debug!(error = %e, "immediate post-action refresh failed");
        }
        self.spawn_settle_refresh();
    }

    /// Detached best-effort refresh after the mechanical settle time.
    ///
    /// No cancellation hook and no propagated failure: a miss here is
    /// corrected by the next periodic poll. A second action issued
    /// mid-settle does not reset the first timer; both fire, and the
    /// last completed refresh wins.
    fn spawn_settle_refresh(&self) {
        let ctrl = self.clone();
        let delay = self.inner.config.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = ctrl.refresh().await {
                warn!(error = %e, "settle refresh failed");
            }
        });
    }

    // ── Credential validation ────────────────────────────────────────

    /// Probe the account for setup flows.
    ///
    /// Distinguishes the three outcomes a setup UI presents: an empty
    /// account, a rejected token, and everything else. On success,
    /// returns the number of smartlocks found.
    pub async fn validate_account(&self) -> Result<usize, ValidationError> {
        match self.inner.client.list_smartlocks().await {
            Ok(locks) if locks.is_empty() => Err(ValidationError::NoLocksFound),
            Ok(locks) => Ok(locks.len()),
            Err(e) if e.is_auth() => Err(ValidationError::InvalidCredential),
            Err(e) => Err(ValidationError::Unknown(e)),
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Periodic poll sharing the controller's refresh primitive and its
/// failure policy.
async fn refresh_task(controller: Controller, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = controller.refresh().await {
                    debug!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
