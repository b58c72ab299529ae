/*!
Registry - dispatch table plus the lazy-loading bookkeeping.

Three tables, all keyed by event name:
- `listeners`: callbacks bucketed by priority (highest first), insertion
  order within a bucket
- `pending`: service registrations not yet resolved to instances
- `loaded`: last instance resolved for each `"<service>.<method>"` key

Nothing here calls into listeners or the locator.
*/

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::listener::{Callback, Listener};
use crate::types::ServiceId;

/// A service registration waiting for its event to fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingListener {
  /// Service to resolve.
  pub service: ServiceId,
  /// Method to bind on the resolved instance.
  pub method: String,
  /// Higher runs first.
  pub priority: i32,
}

impl PendingListener {
  /// Dedup key: at most one resolved entry per key and event.
  pub fn key(&self) -> String {
    format!("{}.{}", self.service, self.method)
  }
}

#[derive(Default)]
pub(crate) struct Registry {
  listeners: HashMap<String, BTreeMap<Reverse<i32>, Vec<Callback>>>,
  pending: HashMap<String, Vec<PendingListener>>,
  loaded: HashMap<String, HashMap<String, Arc<dyn Listener>>>,
}

impl Registry {
  pub(super) fn new() -> Self {
    Self::default()
  }

  // === Dispatch table ===

  pub(super) fn add(&mut self, event: &str, callback: Callback, priority: i32) {
    self
      .listeners
      .entry(event.to_owned())
      .or_default()
      .entry(Reverse(priority))
      .or_default()
      .push(callback);
  }

  /// Remove the first entry equal to `callback`. Returns whether one was found.
  pub(super) fn remove(&mut self, event: &str, callback: &Callback) -> bool {
    let Some(buckets) = self.listeners.get_mut(event) else {
      return false;
    };

    let mut removed = false;
    buckets.retain(|_, bucket| {
      if !removed {
        if let Some(index) = bucket.iter().position(|existing| existing == callback) {
          bucket.remove(index);
          removed = true;
        }
      }
      !bucket.is_empty()
    });

    if buckets.is_empty() {
      self.listeners.remove(event);
    }
    removed
  }

  /// Snapshot of the callbacks for `event`, in invocation order.
  pub(super) fn listeners(&self, event: &str) -> Vec<Callback> {
    self
      .listeners
      .get(event)
      .map(|buckets| buckets.values().flatten().cloned().collect())
      .unwrap_or_default()
  }

  pub(super) fn listener_events(&self) -> Vec<String> {
    self.listeners.keys().cloned().collect()
  }

  /// Priority an identical callback was registered with.
  pub(super) fn priority_of(&self, event: &str, callback: &Callback) -> Option<i32> {
    self.listeners.get(event).and_then(|buckets| {
      buckets
        .iter()
        .find(|(_, bucket)| bucket.contains(callback))
        .map(|(Reverse(priority), _)| *priority)
    })
  }

  pub(super) fn has(&self, event: &str) -> bool {
    self.pending.contains_key(event) || self.listeners.contains_key(event)
  }

  pub(super) fn has_any(&self) -> bool {
    !self.pending.is_empty() || !self.listeners.is_empty()
  }

  // === Pending service registrations ===

  pub(super) fn add_pending(&mut self, event: &str, pending: PendingListener) {
    self
      .pending
      .entry(event.to_owned())
      .or_default()
      .push(pending);
  }

  pub(super) fn pending(&self, event: &str) -> &[PendingListener] {
    self.pending.get(event).map_or(&[], Vec::as_slice)
  }

  pub(super) fn pending_events(&self) -> Vec<String> {
    self.pending.keys().cloned().collect()
  }

  // === Resolved instances ===

  pub(super) fn loaded(&self, event: &str, key: &str) -> Option<Arc<dyn Listener>> {
    self
      .loaded
      .get(event)
      .and_then(|entries| entries.get(key))
      .cloned()
  }

  pub(super) fn record_loaded(&mut self, event: &str, key: String, listener: Arc<dyn Listener>) {
    self
      .loaded
      .entry(event.to_owned())
      .or_default()
      .insert(key, listener);
  }

  pub(super) fn loaded_keys(&self, event: &str) -> Vec<String> {
    let mut keys: Vec<String> = self
      .loaded
      .get(event)
      .map(|entries| entries.keys().cloned().collect())
      .unwrap_or_default();
    keys.sort();
    keys
  }
}
