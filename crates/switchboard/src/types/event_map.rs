/*!
Event-to-method maps declared by subscribers and connectors.

Each event maps to one of three shapes, mirroring the declaration format:

```text
"kernel.request": "onRequest"                          // method, priority 0
"kernel.request": ["onRequest", 10]                    // method + priority
"kernel.request": [["onRequest", 10], ["audit", -5]]   // several bindings
"kernel.request": [["onRequest", 10], "audit"]         // bare names mix in at priority 0
```
*/

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One (method, priority) binding for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
  pub method: String,
  pub priority: i32,
}

impl Binding {
  pub fn new(method: impl Into<String>, priority: i32) -> Self {
    Self {
      method: method.into(),
      priority,
    }
  }
}

/// Value side of an [`EventMap`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subscription {
  /// Bare method name at priority 0.
  Method(String),
  /// Method name with an explicit priority.
  Prioritized(String, i32),
  /// Several bindings on the same event.
  Many(Vec<MethodRef>),
}

/// One element of a [`Subscription::Many`] list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodRef {
  /// Bare method name at priority 0.
  Name(String),
  /// Method name with an explicit priority.
  Prioritized(String, i32),
}

impl MethodRef {
  pub fn binding(&self) -> Binding {
    match self {
      Self::Name(method) => Binding::new(method.as_str(), 0),
      Self::Prioritized(method, priority) => Binding::new(method.as_str(), *priority),
    }
  }
}

impl From<&str> for MethodRef {
  fn from(method: &str) -> Self {
    Self::Name(method.to_owned())
  }
}

impl From<(&str, i32)> for MethodRef {
  fn from((method, priority): (&str, i32)) -> Self {
    Self::Prioritized(method.to_owned(), priority)
  }
}

impl Subscription {
  /// Flatten into bindings, in declaration order.
  pub fn bindings(&self) -> Vec<Binding> {
    match self {
      Self::Method(method) => vec![Binding::new(method.as_str(), 0)],
      Self::Prioritized(method, priority) => vec![Binding::new(method.as_str(), *priority)],
      Self::Many(list) => list.iter().map(MethodRef::binding).collect(),
    }
  }
}

impl From<&str> for Subscription {
  fn from(method: &str) -> Self {
    Self::Method(method.to_owned())
  }
}

impl From<String> for Subscription {
  fn from(method: String) -> Self {
    Self::Method(method)
  }
}

impl From<(&str, i32)> for Subscription {
  fn from((method, priority): (&str, i32)) -> Self {
    Self::Prioritized(method.to_owned(), priority)
  }
}

impl From<(String, i32)> for Subscription {
  fn from((method, priority): (String, i32)) -> Self {
    Self::Prioritized(method, priority)
  }
}

impl From<Vec<(&str, i32)>> for Subscription {
  fn from(list: Vec<(&str, i32)>) -> Self {
    Self::Many(list.into_iter().map(MethodRef::from).collect())
  }
}

impl From<Vec<MethodRef>> for Subscription {
  fn from(list: Vec<MethodRef>) -> Self {
    Self::Many(list)
  }
}

/// Ordered map from event name to [`Subscription`].
///
/// Declaration order is kept: it decides the registration order, and so the
/// firing order of bindings that share a priority. Re-declaring an event
/// replaces its subscription in place.
///
/// ```
/// use switchboard::{Binding, EventMap};
///
/// let events = EventMap::new()
///   .on("kernel.request", "onRequest")
///   .on("kernel.response", ("onResponse", 10));
///
/// let bindings: Vec<_> = events.bindings().collect();
/// assert_eq!(bindings[0], ("kernel.request", Binding::new("onRequest", 0)));
/// assert_eq!(bindings[1], ("kernel.response", Binding::new("onResponse", 10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventMap {
  entries: Vec<(String, Subscription)>,
}

impl EventMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style [`insert`](Self::insert).
  #[must_use]
  pub fn on(mut self, event: impl Into<String>, subscription: impl Into<Subscription>) -> Self {
    self.insert(event, subscription);
    self
  }

  /// Set the subscription for `event`, returning the one it replaced.
  pub fn insert(
    &mut self,
    event: impl Into<String>,
    subscription: impl Into<Subscription>,
  ) -> Option<Subscription> {
    let event = event.into();
    let subscription = subscription.into();

    if let Some((_, existing)) = self.entries.iter_mut().find(|(name, _)| *name == event) {
      return Some(std::mem::replace(existing, subscription));
    }

    self.entries.push((event, subscription));
    None
  }

  pub fn get(&self, event: &str) -> Option<&Subscription> {
    self
      .entries
      .iter()
      .find(|(name, _)| name == event)
      .map(|(_, subscription)| subscription)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Subscription)> + '_ {
    self
      .entries
      .iter()
      .map(|(event, subscription)| (event.as_str(), subscription))
  }

  /// Every (event, binding) pair, flattened in declaration order.
  pub fn bindings(&self) -> impl Iterator<Item = (&str, Binding)> + '_ {
    self.iter().flat_map(|(event, subscription)| {
      subscription
        .bindings()
        .into_iter()
        .map(move |binding| (event, binding))
    })
  }
}

impl<E: Into<String>, S: Into<Subscription>> FromIterator<(E, S)> for EventMap {
  fn from_iter<I: IntoIterator<Item = (E, S)>>(iter: I) -> Self {
    let mut map = Self::new();
    for (event, subscription) in iter {
      map.insert(event, subscription);
    }
    map
  }
}

impl Serialize for EventMap {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (event, subscription) in &self.entries {
      map.serialize_entry(event, subscription)?;
    }
    map.end()
  }
}

impl<'de> Deserialize<'de> for EventMap {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct EventMapVisitor;

    impl<'de> Visitor<'de> for EventMapVisitor {
      type Value = EventMap;

      fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of event names to listener methods")
      }

      // Walk entries ourselves so document order survives.
      fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<EventMap, A::Error> {
        let mut map = EventMap::new();
        while let Some((event, subscription)) = access.next_entry::<String, Subscription>()? {
          map.insert(event, subscription);
        }
        Ok(map)
      }
    }

    deserializer.deserialize_map(EventMapVisitor)
  }
}
