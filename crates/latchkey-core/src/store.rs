// ── Poll snapshot store ──
//
// Concurrent storage for the latest lock records with push-based change
// notification via `watch` channels. Availability ("last poll succeeded")
// is tracked separately from the data itself: a failed poll flips the
// flag but leaves the stale snapshot readable.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::watch;

use latchkey_api::types::SmartlockId;

use crate::model::Lock;

/// The process-wide snapshot for one account connection.
///
/// Writers are the refresh paths (periodic, immediate, settle) racing
/// harmlessly: application is idempotent over the whole collection and
/// last-write-wins is acceptable. Readers always see the latest completed
/// snapshot.
pub struct LockStore {
    /// Primary storage: smartlock id -> latest record.
    by_id: DashMap<SmartlockId, Arc<Lock>>,

    /// Full snapshot, rebuilt on mutation for efficient subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<Lock>>>>,

    /// Whether the most recent poll succeeded. Starts false; decoupled
    /// from data retention.
    available: watch::Sender<bool>,

    /// Timestamp of the last successful poll.
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl LockStore {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (available, _) = watch::channel(false);
        let (last_refresh, _) = watch::channel(None);

        Self {
            by_id: DashMap::new(),
            snapshot,
            available,
            last_refresh,
        }
    }

    /// Apply one successful poll result.
    ///
    /// Upsert-then-prune: incoming records replace existing ones, then any
    /// id absent from the incoming set is removed. This avoids the brief
    /// empty state that clear-then-insert would cause.
    pub(crate) fn apply(&self, incoming: Vec<Lock>) {
        let mut incoming_ids = Vec::with_capacity(incoming.len());
        for lock in incoming {
            incoming_ids.push(lock.id);
            self.by_id.insert(lock.id, Arc::new(lock));
        }
        self.by_id.retain(|id, _| incoming_ids.contains(id));

        self.rebuild_snapshot();
        // `send_replace` updates even with zero receivers.
        self.available.send_replace(true);
        self.last_refresh.send_replace(Some(Utc::now()));
    }

    /// Record a failed poll: dependents become unavailable, prior data
    /// stays readable.
    pub(crate) fn mark_failed(&self) {
        self.available.send_replace(false);
    }

    // ── Read surface ─────────────────────────────────────────────────

    /// Look up one lock by id.
    pub fn get(&self, id: SmartlockId) -> Option<Arc<Lock>> {
        self.by_id.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// The current snapshot (cheap `Arc` clone), ordered by id.
    pub fn all(&self) -> Arc<Vec<Arc<Lock>>> {
        self.snapshot.borrow().clone()
    }

    /// `true` if the most recent poll succeeded.
    pub fn is_available(&self) -> bool {
        *self.available.borrow()
    }

    /// When the last successful poll completed.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<Lock>>>> {
        self.snapshot.subscribe()
    }

    /// Subscribe to availability changes.
    pub fn subscribe_availability(&self) -> watch::Receiver<bool> {
        self.available.subscribe()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all records ordered by id and broadcast to subscribers.
    fn rebuild_snapshot(&self) {
        let mut values: Vec<Arc<Lock>> =
            self.by_id.iter().map(|r| Arc::clone(r.value())).collect();
        values.sort_by_key(|l| l.id);
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}
