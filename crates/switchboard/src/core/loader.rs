/*!
Lazy resolution of service-backed listeners.

For each pending registration of an event:

```text
resolve(service) ──► Listener ─────────────┐
                 └─► Connector ─► listener()┤
                                            ▼
                             key = "<service>.<method>"
                 ┌──────────────────────────┼───────────────────────────┐
            no entry                  same instance               new instance
      add at priority                   no-op            remove stale, add at priority
                 └──────────────────────────┴───────────────────────────┘
                                 record instance under key
```

The locator is called without holding the registry lock. Errors abort the
load; registrations handled before the error stay registered.
*/

use std::sync::Arc;

use super::registry::{PendingListener, Registry};
use super::Dispatcher;
use crate::listener::{same_instance, Callback, Listener};
use crate::locator::Service;
use crate::types::WiringResult;

impl Dispatcher {
  /// Resolve every pending registration of `event` into the dispatch table.
  pub(crate) fn lazy_load(&self, event: &str) -> WiringResult<()> {
    let pending = self.read(|r| r.pending(event).to_vec());

    for registration in pending {
      let listener = self.resolve_listener(&registration)?;
      self.install(event, registration, listener);
    }

    Ok(())
  }

  /// Resolve `event` for every event with pending registrations.
  pub(crate) fn lazy_load_all(&self) -> WiringResult<()> {
    for event in self.read(Registry::pending_events) {
      self.lazy_load(&event)?;
    }
    Ok(())
  }

  fn resolve_listener(&self, registration: &PendingListener) -> WiringResult<Arc<dyn Listener>> {
    match self.locator.resolve(&registration.service)? {
      Service::Listener(listener) => Ok(listener),
      Service::Connector(connector) => connector.listener(),
    }
  }

  fn install(&self, event: &str, registration: PendingListener, listener: Arc<dyn Listener>) {
    let key = registration.key();
    let PendingListener {
      service,
      method,
      priority,
    } = registration;

    self.write(|r| {
      match r.loaded(event, &key) {
        None => {
          log::debug!("Loaded listener {service}::{method} for \"{event}\" (priority {priority})");
          r.add(event, Callback::method(Arc::clone(&listener), method), priority);
        }
        Some(previous) if !same_instance(&previous, &listener) => {
          log::debug!("Service {service} changed instance, re-registering {method} for \"{event}\"");
          r.remove(event, &Callback::method(previous, method.as_str()));
          r.add(event, Callback::method(Arc::clone(&listener), method), priority);
        }
        Some(_) => {}
      }
      r.record_loaded(event, key, listener);
    });
  }

  /// Registrations not yet resolved for `event`, in registration order.
  pub fn pending_listeners(&self, event: &str) -> Vec<PendingListener> {
    self.read(|r| r.pending(event).to_vec())
  }

  /// Dedup keys (`"<service>.<method>"`) resolved so far for `event`, sorted.
  pub fn loaded_keys(&self, event: &str) -> Vec<String> {
    self.read(|r| r.loaded_keys(event))
  }
}
