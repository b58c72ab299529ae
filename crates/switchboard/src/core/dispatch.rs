/*!
Dispatch and direct listener management.

Dispatch uses a snapshot model: the callbacks for an event are copied out
of the registry, then invoked with no lock held. Listeners may add or remove
listeners on the same dispatcher; changes apply to the next dispatch.
*/

use std::collections::BTreeMap;
use std::sync::Arc;

use super::registry::Registry;
use super::Dispatcher;
use crate::listener::{Callback, Listener, Subscriber};
use crate::types::{Event, WiringResult};

impl Dispatcher {
  /// Fire `event_name`, resolving its service-backed listeners first.
  ///
  /// Listeners run by descending priority, registration order within a
  /// priority, until one stops propagation. The first listener or locator
  /// error aborts the dispatch.
  pub fn dispatch(&self, event_name: &str, event: Option<Event>) -> WiringResult<Event> {
    self.lazy_load(event_name)?;

    let mut event = event.unwrap_or_default();
    event.set_name(event_name);

    let listeners = self.read(|r| r.listeners(event_name));
    for listener in &listeners {
      listener.invoke(&mut event)?;
      if event.is_propagation_stopped() {
        log::debug!("Propagation of \"{event_name}\" stopped");
        break;
      }
    }

    Ok(event)
  }

  /// Register a callback. Higher priorities run first.
  pub fn add_listener(&self, event: &str, callback: Callback, priority: i32) {
    self.write(|r| r.add(event, callback, priority));
  }

  /// Remove a callback registered for `event`. Returns whether one was found.
  pub fn remove_listener(&self, event: &str, callback: &Callback) -> bool {
    self.write(|r| r.remove(event, callback))
  }

  /// Register each binding `S` declares, bound to `subscriber`.
  pub fn add_subscriber<S: Subscriber>(&self, subscriber: &Arc<S>) {
    let events = S::subscribed_events();
    self.write(|r| {
      for (event, binding) in events.bindings() {
        let target: Arc<dyn Listener> = subscriber.clone();
        r.add(event, Callback::method(target, binding.method), binding.priority);
      }
    });
  }

  /// Remove every binding `S` declares for `subscriber`.
  pub fn remove_subscriber<S: Subscriber>(&self, subscriber: &Arc<S>) {
    let events = S::subscribed_events();
    self.write(|r| {
      for (event, binding) in events.bindings() {
        let target: Arc<dyn Listener> = subscriber.clone();
        r.remove(event, &Callback::method(target, binding.method));
      }
    });
  }

  /// Callbacks for `event` in invocation order, resolving services first.
  pub fn listeners(&self, event: &str) -> WiringResult<Vec<Callback>> {
    self.lazy_load(event)?;
    Ok(self.read(|r| r.listeners(event)))
  }

  /// Callbacks for every event, resolving every pending service first.
  pub fn all_listeners(&self) -> WiringResult<BTreeMap<String, Vec<Callback>>> {
    self.lazy_load_all()?;
    Ok(self.read(|r| {
      r.listener_events()
        .into_iter()
        .map(|event| {
          let listeners = r.listeners(&event);
          (event, listeners)
        })
        .collect()
    }))
  }

  /// Priority `callback` was registered with for `event`.
  pub fn priority_of(&self, event: &str, callback: &Callback) -> Option<i32> {
    self.read(|r| r.priority_of(event, callback))
  }

  /// Whether `event` has any listener, resolved or still pending.
  ///
  /// Never resolves services.
  pub fn has_listeners(&self, event: &str) -> bool {
    self.read(|r| r.has(event))
  }

  /// Whether any event has a listener, resolved or still pending.
  pub fn has_any_listeners(&self) -> bool {
    self.read(Registry::has_any)
  }
}
