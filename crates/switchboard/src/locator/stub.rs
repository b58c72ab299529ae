/*! Deferred service lookup. */

use std::fmt;
use std::sync::{Arc, Weak};

use super::{Service, ServiceLocator};
use crate::listener::Listener;
use crate::types::{ServiceId, WiringError, WiringResult};

/// A (locator, id) pair resolved on demand.
///
/// Holds the locator weakly: a connector stored inside the locator it points
/// at must not keep that locator alive.
#[derive(Clone)]
pub struct ServiceStub {
  locator: Weak<dyn ServiceLocator>,
  id: ServiceId,
}

impl ServiceStub {
  /// Defer resolving `id` through `locator`.
  pub fn new(locator: &Arc<dyn ServiceLocator>, id: impl Into<ServiceId>) -> Self {
    Self {
      locator: Arc::downgrade(locator),
      id: id.into(),
    }
  }

  /// The service this stub resolves.
  pub const fn id(&self) -> &ServiceId {
    &self.id
  }

  /// Look the service up now.
  pub fn resolve(&self) -> WiringResult<Service> {
    let locator = self
      .locator
      .upgrade()
      .ok_or_else(|| WiringError::LocatorDropped(self.id.clone()))?;
    locator.resolve(&self.id)
  }

  /// Look the service up and reduce it to a callable listener.
  pub(crate) fn resolve_listener(&self) -> WiringResult<Arc<dyn Listener>> {
    match self.resolve()? {
      Service::Listener(listener) => Ok(listener),
      Service::Connector(connector) => connector.listener(),
    }
  }
}

impl fmt::Debug for ServiceStub {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ServiceStub")
      .field("id", &self.id)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::locator::Container;
  use crate::testing::Recorder;

  #[test]
  fn resolves_through_locator() {
    let locator: Arc<dyn ServiceLocator> = Arc::new(Container::new());
    let stub = ServiceStub::new(&locator, "app.missing");
    assert!(matches!(
      stub.resolve(),
      Err(WiringError::ServiceNotFound(id)) if id.as_str() == "app.missing"
    ));
  }

  #[test]
  fn dropped_locator_is_reported() {
    let container = Container::new();
    container.set("app.svc", Service::listener(Recorder::new("svc").0));
    let locator: Arc<dyn ServiceLocator> = Arc::new(container);
    let stub = ServiceStub::new(&locator, "app.svc");

    assert!(stub.resolve().is_ok());
    drop(locator);
    assert!(matches!(
      stub.resolve(),
      Err(WiringError::LocatorDropped(_))
    ));
  }
}
