/*!
Service location: turning a [`ServiceId`] into a live instance.

The dispatcher only needs [`ServiceLocator::resolve`]. [`Container`] is a small
memoizing implementation; [`ServiceStub`] defers a lookup until first use.
*/

mod container;
mod stub;

pub use container::Container;
pub use stub::ServiceStub;

use std::fmt;
use std::sync::Arc;

use crate::connector::Connector;
use crate::listener::Listener;
use crate::types::{ServiceId, WiringResult};

/// What a service id resolves to.
#[derive(Clone)]
pub enum Service {
  /// Callable directly.
  Listener(Arc<dyn Listener>),
  /// Registered through its event map; calls go to its listener.
  Connector(Arc<Connector>),
}

impl Service {
  /// Wrap a concrete listener.
  pub fn listener<L: Listener>(listener: Arc<L>) -> Self {
    Self::Listener(listener)
  }

  /// Wrap a connector.
  pub fn connector(connector: Connector) -> Self {
    Self::Connector(Arc::new(connector))
  }
}

impl fmt::Debug for Service {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Listener(listener) => f
        .debug_tuple("Listener")
        .field(&Arc::as_ptr(listener).cast::<()>())
        .finish(),
      Self::Connector(connector) => f.debug_tuple("Connector").field(connector).finish(),
    }
  }
}

/// Maps service ids to live instances.
///
/// Implementations are expected to memoize within a scope: resolving the same
/// id twice returns the same instance until the scope changes.
pub trait ServiceLocator: Send + Sync {
  /// Resolve `id`, failing with [`WiringError::ServiceNotFound`](crate::WiringError::ServiceNotFound)
  /// when it is unknown.
  fn resolve(&self, id: &ServiceId) -> WiringResult<Service>;
}
