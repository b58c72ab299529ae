/*!
Memoizing service container.

Two kinds of definitions:
- shared instances (`set`), returned as-is forever
- factories (`register`), called on first lookup and memoized until
  [`Container::enter_scope`] starts a new scope

Factories are cloned out of the definition table before they run, so a
factory may resolve other services from the same container.
*/

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{Service, ServiceLocator};
use crate::types::{ServiceId, WiringError, WiringResult};

type Factory = Arc<dyn Fn(&Container) -> Service + Send + Sync>;

#[derive(Clone)]
enum Definition {
  Shared(Service),
  Factory(Factory),
}

/// A minimal service container.
#[derive(Default)]
pub struct Container {
  definitions: RwLock<HashMap<ServiceId, Definition>>,
  /// Factory results for the current scope.
  instances: Mutex<HashMap<ServiceId, Service>>,
}

impl Container {
  /// Empty container.
  pub fn new() -> Self {
    Self::default()
  }

  /// Define `id` as a fixed instance. Replaces any previous definition.
  pub fn set(&self, id: impl Into<ServiceId>, service: Service) {
    let id = id.into();
    self.instances.lock().remove(&id);
    self.definitions.write().insert(id, Definition::Shared(service));
  }

  /// Define `id` as built by `factory` on first lookup in each scope.
  pub fn register<F>(&self, id: impl Into<ServiceId>, factory: F)
  where
    F: Fn(&Self) -> Service + Send + Sync + 'static,
  {
    let id = id.into();
    self.instances.lock().remove(&id);
    self
      .definitions
      .write()
      .insert(id, Definition::Factory(Arc::new(factory)));
  }

  /// Whether `id` has a definition.
  pub fn contains(&self, id: &ServiceId) -> bool {
    self.definitions.read().contains_key(id)
  }

  /// Whether `id` has an instance in the current scope.
  pub fn is_initialized(&self, id: &ServiceId) -> bool {
    match self.definitions.read().get(id) {
      Some(Definition::Shared(_)) => true,
      Some(Definition::Factory(_)) => self.instances.lock().contains_key(id),
      None => false,
    }
  }

  /// Forget every factory-built instance; the next lookup builds a new one.
  pub fn enter_scope(&self) {
    let dropped = std::mem::take(&mut *self.instances.lock());
    log::debug!("Container entered new scope, dropped {} instances", dropped.len());
  }
}

impl ServiceLocator for Container {
  fn resolve(&self, id: &ServiceId) -> WiringResult<Service> {
    if let Some(service) = self.instances.lock().get(id) {
      return Ok(service.clone());
    }

    let definition = self
      .definitions
      .read()
      .get(id)
      .cloned()
      .ok_or_else(|| WiringError::ServiceNotFound(id.clone()))?;

    match definition {
      Definition::Shared(service) => Ok(service),
      Definition::Factory(factory) => {
        let built = factory(self);
        // A nested lookup may have built it first; keep whichever landed first.
        let service = self
          .instances
          .lock()
          .entry(id.clone())
          .or_insert(built)
          .clone();
        Ok(service)
      }
    }
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("definitions", &self.definitions.read().len())
      .field("instances", &self.instances.lock().len())
      .finish()
  }
}
