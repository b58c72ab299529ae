/*!
Listener capabilities and the callbacks stored in the dispatch table.

A listener is a service instance plus a method name. Services implement
[`Listener`] and route `method` themselves; types that know their own
bindings up front implement [`Subscriber`] as well.
*/

use std::fmt;
use std::sync::Arc;

use crate::connected::ConnectedListener;
use crate::types::{Event, EventMap, WiringResult};

/// A service that can receive events.
pub trait Listener: Send + Sync + 'static {
  /// Invoke `method` with the event being dispatched.
  ///
  /// Unknown methods should return [`WiringError::UnknownMethod`](crate::WiringError::UnknownMethod).
  fn call(&self, method: &str, event: &mut Event) -> WiringResult<()>;

  /// Back-references to the connectors holding this listener, if it tracks them.
  fn connections(&self) -> Option<&ConnectedListener> {
    None
  }
}

/// A listener that declares which events it handles.
pub trait Subscriber: Listener {
  /// Event-to-method bindings, fixed per type.
  fn subscribed_events() -> EventMap;
}

/// Closure listener signature.
pub type ListenerFn = dyn Fn(&mut Event) -> WiringResult<()> + Send + Sync;

/// An entry in the dispatch table.
///
/// Equality is identity: two callbacks are equal when they point at the same
/// instance with the same method, or at the same closure allocation.
#[derive(Clone)]
pub enum Callback {
  /// A method on a listener instance.
  Method {
    /// Instance the method is called on.
    target: Arc<dyn Listener>,
    /// Method name passed to [`Listener::call`].
    method: String,
  },
  /// A plain closure.
  Closure(Arc<ListenerFn>),
}

impl Callback {
  /// Bind `method` on `target`.
  pub fn method(target: Arc<dyn Listener>, method: impl Into<String>) -> Self {
    Self::Method {
      target,
      method: method.into(),
    }
  }

  /// Wrap a closure.
  pub fn closure(f: impl Fn(&mut Event) -> WiringResult<()> + Send + Sync + 'static) -> Self {
    Self::Closure(Arc::new(f))
  }

  /// The bound instance, for method callbacks.
  pub fn target(&self) -> Option<&Arc<dyn Listener>> {
    match self {
      Self::Method { target, .. } => Some(target),
      Self::Closure(_) => None,
    }
  }

  /// The bound method name, for method callbacks.
  pub fn method_name(&self) -> Option<&str> {
    match self {
      Self::Method { method, .. } => Some(method),
      Self::Closure(_) => None,
    }
  }

  pub(crate) fn invoke(&self, event: &mut Event) -> WiringResult<()> {
    match self {
      Self::Method { target, method } => target.call(method, event),
      Self::Closure(f) => f(event),
    }
  }
}

impl PartialEq for Callback {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (
        Self::Method { target, method },
        Self::Method {
          target: other_target,
          method: other_method,
        },
      ) => method == other_method && same_instance(target, other_target),
      (Self::Closure(f), Self::Closure(g)) => std::ptr::addr_eq(Arc::as_ptr(f), Arc::as_ptr(g)),
      (Self::Method { .. }, Self::Closure(_)) | (Self::Closure(_), Self::Method { .. }) => false,
    }
  }
}

impl fmt::Debug for Callback {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Method { target, method } => f
        .debug_struct("Method")
        .field("target", &Arc::as_ptr(target).cast::<()>())
        .field("method", method)
        .finish(),
      Self::Closure(closure) => f
        .debug_tuple("Closure")
        .field(&Arc::as_ptr(closure).cast::<()>())
        .finish(),
    }
  }
}

/// Whether two handles point at the same listener allocation.
///
/// Compares data pointers only; vtable pointers for one type may differ
/// between codegen units.
pub fn same_instance(a: &Arc<dyn Listener>, b: &Arc<dyn Listener>) -> bool {
  std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
