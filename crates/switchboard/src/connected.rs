/*!
Back-references from a listener to the connectors that hold it.

Connectors own their listener; the listener only observes its connectors.
Entries are weak, so a dropped connector disappears from [`ConnectedListener::connectors`]
without any explicit removal. Purely diagnostic.
*/

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::connector::Connector;

/// Embed in a listener and return it from
/// [`Listener::connections`](crate::Listener::connections) to track connectors.
#[derive(Default)]
pub struct ConnectedListener {
  connectors: Mutex<Vec<Weak<Connector>>>,
}

impl ConnectedListener {
  /// Empty set.
  pub fn new() -> Self {
    Self::default()
  }

  /// Record `connector` as pointing at this listener. Append-only.
  pub fn add_connector(&self, connector: &Arc<Connector>) {
    self.connectors.lock().push(Arc::downgrade(connector));
  }

  /// Connectors that still exist, in the order they were added.
  pub fn connectors(&self) -> Vec<Arc<Connector>> {
    self
      .connectors
      .lock()
      .iter()
      .filter_map(Weak::upgrade)
      .collect()
  }
}

impl fmt::Debug for ConnectedListener {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ConnectedListener")
      .field("connectors", &self.connectors.lock().len())
      .finish()
  }
}
