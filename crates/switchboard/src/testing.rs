/*! Test doubles shared by the unit tests. */

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::connected::ConnectedListener;
use crate::listener::{Listener, Subscriber};
use crate::locator::{Container, Service, ServiceLocator};
use crate::types::{Event, EventMap, ServiceId, WiringError, WiringResult};

/// Shared, ordered record of listener calls.
#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
  pub(crate) fn push(&self, entry: impl Into<String>) {
    self.0.lock().push(entry.into());
  }

  /// Drain the log.
  pub(crate) fn take(&self) -> Vec<String> {
    std::mem::take(&mut *self.0.lock())
  }
}

/// Listener that logs `"<name>::<method>"` for every call.
///
/// Method `"stop"` also stops propagation; method `"fail"` returns an error.
#[derive(Debug)]
pub(crate) struct Recorder {
  name: String,
  log: CallLog,
  connections: ConnectedListener,
}

impl Recorder {
  pub(crate) fn new(name: impl Into<String>) -> (Arc<Self>, CallLog) {
    let log = CallLog::default();
    (Self::with_log(name, &log), log)
  }

  pub(crate) fn with_log(name: impl Into<String>, log: &CallLog) -> Arc<Self> {
    Arc::new(Self {
      name: name.into(),
      log: log.clone(),
      connections: ConnectedListener::new(),
    })
  }
}

impl Listener for Recorder {
  fn call(&self, method: &str, event: &mut Event) -> WiringResult<()> {
    self.log.push(format!("{}::{method}", self.name));
    match method {
      "stop" => event.stop_propagation(),
      "fail" => {
        return Err(WiringError::ListenerFailed {
          event: event.name().unwrap_or_default().to_owned(),
          reason: format!("{} failed", self.name),
        })
      }
      _ => {}
    }
    Ok(())
  }

  fn connections(&self) -> Option<&ConnectedListener> {
    Some(&self.connections)
  }
}

/// Subscriber with a fixed map: `kernel.request` at priority 10,
/// `kernel.response` at priority 0.
pub(crate) struct RouterSubscriber {
  log: CallLog,
}

impl RouterSubscriber {
  pub(crate) fn new(log: &CallLog) -> Self {
    Self { log: log.clone() }
  }
}

impl Listener for RouterSubscriber {
  fn call(&self, method: &str, _event: &mut Event) -> WiringResult<()> {
    match method {
      "onRequest" | "onResponse" => {
        self.log.push(format!("router::{method}"));
        Ok(())
      }
      _ => Err(WiringError::UnknownMethod {
        method: method.to_owned(),
      }),
    }
  }
}

impl Subscriber for RouterSubscriber {
  fn subscribed_events() -> EventMap {
    EventMap::new()
      .on("kernel.request", ("onRequest", 10))
      .on("kernel.response", "onResponse")
  }
}

/// Locator wrapper counting lookups per id.
pub(crate) struct CountingLocator {
  inner: Container,
  counts: Mutex<HashMap<ServiceId, usize>>,
}

impl CountingLocator {
  pub(crate) fn new(inner: Container) -> Self {
    Self {
      inner,
      counts: Mutex::new(HashMap::new()),
    }
  }

  pub(crate) const fn inner(&self) -> &Container {
    &self.inner
  }

  pub(crate) fn resolutions(&self, id: &str) -> usize {
    self
      .counts
      .lock()
      .get(&ServiceId::from(id))
      .copied()
      .unwrap_or_default()
  }

  pub(crate) fn total_resolutions(&self) -> usize {
    self.counts.lock().values().sum()
  }
}

impl ServiceLocator for CountingLocator {
  fn resolve(&self, id: &ServiceId) -> WiringResult<Service> {
    *self.counts.lock().entry(id.clone()).or_default() += 1;
    self.inner.resolve(id)
  }
}
