/*! Branded ID types. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Identifier of a service known to a [`ServiceLocator`](crate::ServiceLocator).
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct ServiceId(pub String);

impl ServiceId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ServiceId {
  fn from(id: &str) -> Self {
    Self(id.to_owned())
  }
}

impl From<&ServiceId> for ServiceId {
  fn from(id: &ServiceId) -> Self {
    id.clone()
  }
}
