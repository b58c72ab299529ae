/*!
Connectors: one service fanning out to several event bindings.

A connector owns a static [`EventMap`] and a listener slot. The slot is empty,
holds a live listener, or holds a [`ServiceStub`] that is resolved the first
time the listener is needed and then replaced by the live instance.

Resolution is shared between threads: while one thread resolves the stub,
other callers wait for its result. Only the resolving thread re-entering
its own connector is a cycle.

When registered with [`Dispatcher::add_connector_service`](crate::Dispatcher::add_connector_service)
the connector is registered under its own service id for every binding; the
lazy loader calls [`Connector::listener`] to reach the real target.

## States

```text
unattached ──attach(dispatcher)──► attached
    ▲                                 │
    └─────────────detach()────────────┘
```
*/

use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use crate::core::{Dispatcher, WeakDispatcher};
use crate::listener::Listener;
use crate::locator::ServiceStub;
use crate::types::{EventMap, ServiceId, WiringError, WiringResult};

enum Slot {
  Empty,
  Live(Arc<dyn Listener>),
  Deferred(ServiceStub),
  /// Stub taken out for resolution by `thread`.
  Resolving { id: ServiceId, thread: ThreadId },
}

impl Slot {
  const fn state(&self) -> &'static str {
    match self {
      Self::Empty => "empty",
      Self::Live(_) => "live",
      Self::Deferred(_) => "deferred",
      Self::Resolving { .. } => "resolving",
    }
  }
}

/// Holds an events-to-methods map for a listener that may be lazy-loaded.
pub struct Connector {
  events: EventMap,
  slot: Mutex<Slot>,
  /// Signalled whenever a resolution finishes.
  resolved: Condvar,
  dispatcher: Mutex<Option<WeakDispatcher>>,
}

impl Connector {
  /// Create a connector with no listener yet.
  pub fn new(events: EventMap) -> Self {
    Self {
      events,
      slot: Mutex::new(Slot::Empty),
      resolved: Condvar::new(),
      dispatcher: Mutex::new(None),
    }
  }

  /// Create a connector bound to a live listener.
  pub fn with_listener(events: EventMap, listener: Arc<dyn Listener>) -> Arc<Self> {
    let connector = Arc::new(Self::new(events));
    connector.set_listener(listener);
    connector
  }

  /// Create a connector whose listener is resolved on first use.
  pub fn with_deferred_listener(events: EventMap, stub: ServiceStub) -> Arc<Self> {
    let connector = Arc::new(Self::new(events));
    connector.set_deferred_listener(stub);
    connector
  }

  /// The static event-to-method map.
  pub const fn subscribed_events(&self) -> &EventMap {
    &self.events
  }

  /// Replace the held listener.
  ///
  /// Listeners that track their connectors get a back-reference to this one.
  pub fn set_listener(self: &Arc<Self>, listener: Arc<dyn Listener>) {
    if let Some(connections) = listener.connections() {
      connections.add_connector(self);
    }
    self.fill(Slot::Live(listener));
  }

  /// Replace the held listener with a stub resolved on the next [`listener`](Self::listener) call.
  pub fn set_deferred_listener(&self, stub: ServiceStub) {
    self.fill(Slot::Deferred(stub));
  }

  fn fill(&self, slot: Slot) {
    *self.slot.lock() = slot;
    self.resolved.notify_all();
  }

  /// Whether the slot holds a live listener.
  pub fn is_resolved(&self) -> bool {
    matches!(*self.slot.lock(), Slot::Live(_))
  }

  /// The live listener, resolving a deferred stub first if needed.
  ///
  /// A stub is resolved at most once per successful call; on failure it is
  /// put back so a later call can retry. A stub that resolves to another
  /// connector is followed to that connector's listener. Callers on other
  /// threads block until a resolution in progress finishes.
  pub fn listener(self: &Arc<Self>) -> WiringResult<Arc<dyn Listener>> {
    let current = thread::current().id();

    // Take the stub out under the lock, resolve without it.
    let stub = {
      let mut slot = self.slot.lock();
      loop {
        match std::mem::replace(&mut *slot, Slot::Empty) {
          Slot::Live(listener) => {
            *slot = Slot::Live(Arc::clone(&listener));
            return Ok(listener);
          }
          Slot::Empty => return Err(WiringError::NoListener),
          Slot::Resolving { id, thread } if thread == current => {
            *slot = Slot::Resolving {
              id: id.clone(),
              thread,
            };
            return Err(WiringError::CircularReference(id));
          }
          Slot::Resolving { id, thread } => {
            *slot = Slot::Resolving { id, thread };
            self.resolved.wait(&mut slot);
          }
          Slot::Deferred(stub) => {
            *slot = Slot::Resolving {
              id: stub.id().clone(),
              thread: current,
            };
            break stub;
          }
        }
      }
    };

    match stub.resolve_listener() {
      Ok(listener) => {
        log::debug!("Connector resolved deferred listener \"{}\"", stub.id());
        self.set_listener(Arc::clone(&listener));
        Ok(listener)
      }
      Err(e) => {
        self.fill(Slot::Deferred(stub));
        Err(e)
      }
    }
  }

  /// Associate this connector with a dispatcher.
  pub fn attach(&self, dispatcher: &Dispatcher) {
    *self.dispatcher.lock() = Some(dispatcher.downgrade());
  }

  /// Forget the dispatcher association.
  pub fn detach(&self) {
    *self.dispatcher.lock() = None;
  }

  /// Whether the connector is attached to a dispatcher that still exists.
  pub fn is_attached(&self) -> bool {
    self.dispatcher().is_some()
  }

  /// The dispatcher this connector is attached to.
  pub fn dispatcher(&self) -> Option<Dispatcher> {
    self
      .dispatcher
      .lock()
      .as_ref()
      .and_then(WeakDispatcher::upgrade)
  }
}

impl fmt::Debug for Connector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Connector")
      .field("events", &self.events)
      .field("listener", &self.slot.lock().state())
      .field("attached", &self.is_attached())
      .finish()
  }
}
