/*!
Core dispatcher - owns the dispatch table and resolves services lazily.

# Module Structure

- `mod.rs` - Dispatcher handle, builder, lock helpers
- `registry.rs` - dispatch table, pending registrations, resolved instances
- `loader.rs` - lazy resolution of pending registrations for one event
- `dispatch.rs` - `dispatch()`, direct listeners and subscribers, queries
- `services.rs` - service-backed registrations (listeners, subscribers, connectors)

# Example

```ignore
let container = Arc::new(Container::new());
container.register("app.router", |_: &Container| Service::listener(Arc::new(Router::default())));

let dispatcher = Dispatcher::new(container.clone());
dispatcher.add_subscriber_service_for::<Router>("app.router");

// Router is only built here, when the event first fires.
let event = dispatcher.dispatch("kernel.request", None)?;
```
*/

mod dispatch;
mod loader;
mod registry;
mod services;

pub use registry::PendingListener;

use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::compose::{Declaration, RegisterListenersPass, TypeCatalog};
use crate::config::Config;
use crate::locator::ServiceLocator;
use crate::types::WiringResult;
use registry::Registry;

/// Event dispatcher backed by a service locator.
///
/// Clone is cheap (Arc bumps) and clones share the same table.
#[derive(Clone)]
pub struct Dispatcher {
  state: Arc<RwLock<Registry>>,
  locator: Arc<dyn ServiceLocator>,
}

impl fmt::Debug for Dispatcher {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Dispatcher").finish_non_exhaustive()
  }
}

/// Non-owning dispatcher handle, held by attached connectors.
#[derive(Clone)]
pub(crate) struct WeakDispatcher {
  state: Weak<RwLock<Registry>>,
  locator: Weak<dyn ServiceLocator>,
}

impl WeakDispatcher {
  pub(crate) fn upgrade(&self) -> Option<Dispatcher> {
    Some(Dispatcher {
      state: self.state.upgrade()?,
      locator: self.locator.upgrade()?,
    })
  }
}

/// Builder that creates a dispatcher and runs the composition pass over
/// tagged declarations.
///
/// # Example
///
/// ```ignore
/// let dispatcher = Dispatcher::builder(container.clone())
///     .catalog(TypeCatalog::new().with(TypeDescriptor::subscriber::<Router>("app.Router")))
///     .declarations(declarations_from_json(json)?)
///     .build()?;
/// ```
#[must_use = "Builder does nothing until .build() is called"]
pub struct DispatcherBuilder {
  locator: Arc<dyn ServiceLocator>,
  config: Config,
  catalog: TypeCatalog,
  declarations: Vec<Declaration>,
}

impl fmt::Debug for DispatcherBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DispatcherBuilder")
      .field("config", &self.config)
      .field("declarations", &self.declarations.len())
      .finish_non_exhaustive()
  }
}

impl DispatcherBuilder {
  /// Replace the whole configuration.
  pub fn config(mut self, config: Config) -> Self {
    self.config = config;
    self
  }

  /// Derive missing listener method names from the event name. Default: true.
  pub fn derive_method_names(mut self, derive: bool) -> Self {
    self.config.derive_method_names = derive;
    self
  }

  /// Prefix for derived method names. Default: `"on"`.
  pub fn method_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.config.method_prefix = prefix.into();
    self
  }

  /// Types that declarations may name.
  pub fn catalog(mut self, catalog: TypeCatalog) -> Self {
    self.catalog = catalog;
    self
  }

  /// Add one declaration.
  pub fn declare(mut self, declaration: Declaration) -> Self {
    self.declarations.push(declaration);
    self
  }

  /// Add several declarations, in order.
  pub fn declarations(mut self, declarations: impl IntoIterator<Item = Declaration>) -> Self {
    self.declarations.extend(declarations);
    self
  }

  /// Create the dispatcher and register every declaration.
  ///
  /// Configuration errors are detected before anything is registered.
  pub fn build(self) -> WiringResult<Dispatcher> {
    let dispatcher = Dispatcher::new(self.locator);
    RegisterListenersPass::new(&self.config, &self.catalog).process(&dispatcher, &self.declarations)?;
    Ok(dispatcher)
  }
}

impl Dispatcher {
  /// Create an empty dispatcher resolving services through `locator`.
  pub fn new(locator: Arc<dyn ServiceLocator>) -> Self {
    Self {
      state: Arc::new(RwLock::new(Registry::new())),
      locator,
    }
  }

  /// Create a builder for a dispatcher composed from declarations.
  pub fn builder(locator: Arc<dyn ServiceLocator>) -> DispatcherBuilder {
    DispatcherBuilder {
      locator,
      config: Config::default(),
      catalog: TypeCatalog::default(),
      declarations: Vec::new(),
    }
  }

  /// The locator services are resolved through.
  pub fn locator(&self) -> &Arc<dyn ServiceLocator> {
    &self.locator
  }

  pub(crate) fn downgrade(&self) -> WeakDispatcher {
    WeakDispatcher {
      state: Arc::downgrade(&self.state),
      locator: Arc::downgrade(&self.locator),
    }
  }

  /// Read state. Never call listeners or the locator inside the closure.
  #[inline]
  fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
    f(&self.state.read())
  }

  /// Write state. Never call listeners or the locator inside the closure.
  #[inline]
  fn write<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
    f(&mut self.state.write())
  }
}
