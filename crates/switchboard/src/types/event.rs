/*! Event payload passed through the listener chain. */

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named occurrence with a payload that listeners may observe or mutate.
///
/// The name is filled in by [`Dispatcher::dispatch`](crate::Dispatcher::dispatch).
/// Any listener can stop propagation, which skips every listener after it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  data: Value,
  #[serde(default)]
  propagation_stopped: bool,
}

impl Event {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create an event carrying `data`.
  pub fn with_data(data: Value) -> Self {
    Self {
      data,
      ..Self::default()
    }
  }

  /// Name of the event this payload was last dispatched under.
  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub(crate) fn set_name(&mut self, name: &str) {
    self.name = Some(name.to_owned());
  }

  pub const fn data(&self) -> &Value {
    &self.data
  }

  pub fn data_mut(&mut self) -> &mut Value {
    &mut self.data
  }

  /// Stop the remaining listeners from being called.
  pub fn stop_propagation(&mut self) {
    self.propagation_stopped = true;
  }

  pub const fn is_propagation_stopped(&self) -> bool {
    self.propagation_stopped
  }
}
