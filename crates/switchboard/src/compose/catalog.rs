/*!
Type catalog: what a declared type name is capable of.

Declarations name types by string. The catalog maps those names to
descriptors built from trait bounds, so capability checks happen once at
composition time instead of on every dispatch.
*/

use std::collections::HashMap;
use std::fmt;

use crate::listener::Subscriber;
use crate::types::EventMap;

#[derive(Clone, Copy)]
enum Capability {
  Listener,
  Subscriber(fn() -> EventMap),
  Connector,
}

/// A named type and its capability.
#[derive(Clone)]
pub struct TypeDescriptor {
  name: String,
  capability: Capability,
}

impl TypeDescriptor {
  /// A plain listener type, usable only through listener declarations.
  pub fn listener(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      capability: Capability::Listener,
    }
  }

  /// A subscriber type; its event map comes from [`Subscriber::subscribed_events`].
  pub fn subscriber<S: Subscriber>(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      capability: Capability::Subscriber(S::subscribed_events),
    }
  }

  /// A connector type.
  pub fn connector(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      capability: Capability::Connector,
    }
  }

  /// Name declarations refer to.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The declared event map, for subscriber types.
  pub fn subscribed_events(&self) -> Option<EventMap> {
    match self.capability {
      Capability::Subscriber(events) => Some(events()),
      Capability::Listener | Capability::Connector => None,
    }
  }

  /// Whether the type declares an event map.
  pub const fn is_subscriber(&self) -> bool {
    matches!(self.capability, Capability::Subscriber(_))
  }

  /// Whether the type is a connector.
  pub const fn is_connector(&self) -> bool {
    matches!(self.capability, Capability::Connector)
  }
}

impl fmt::Debug for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let capability = match self.capability {
      Capability::Listener => "listener",
      Capability::Subscriber(_) => "subscriber",
      Capability::Connector => "connector",
    };
    f.debug_struct("TypeDescriptor")
      .field("name", &self.name)
      .field("capability", &capability)
      .finish()
  }
}

/// Type names known to the composition pass.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
  types: HashMap<String, TypeDescriptor>,
}

impl TypeCatalog {
  /// Empty catalog.
  pub fn new() -> Self {
    Self::default()
  }

  /// Add `descriptor`, builder style.
  #[must_use]
  pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
    self.register(descriptor);
    self
  }

  /// Add `descriptor`, replacing any type of the same name.
  pub fn register(&mut self, descriptor: TypeDescriptor) {
    self.types.insert(descriptor.name.clone(), descriptor);
  }

  /// Descriptor registered under `name`.
  pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
    self.types.get(name)
  }
}
