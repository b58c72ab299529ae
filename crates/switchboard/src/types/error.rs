/*! Error types for switchboard operations. */

use super::ServiceId;

/// Errors that can occur while composing or dispatching.
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
  /// A declaration is malformed. Composition aborts.
  #[error("Invalid configuration for service \"{id}\": {reason}")]
  Configuration { id: ServiceId, reason: String },

  #[error("Service not found: {0}")]
  ServiceNotFound(ServiceId),

  #[error("Connector has no listener")]
  NoListener,

  #[error("Circular reference while resolving service \"{0}\"")]
  CircularReference(ServiceId),

  #[error("Service locator was dropped before \"{0}\" could be resolved")]
  LocatorDropped(ServiceId),

  #[error("Unknown listener method: {method}")]
  UnknownMethod { method: String },

  #[error("Listener failed on \"{event}\": {reason}")]
  ListenerFailed { event: String, reason: String },

  #[error("Invalid declarations: {0}")]
  InvalidDeclarations(#[from] serde_json::Error),
}

impl WiringError {
  pub(crate) fn configuration(id: &ServiceId, reason: impl Into<String>) -> Self {
    Self::Configuration {
      id: id.clone(),
      reason: reason.into(),
    }
  }
}

/// Result type for switchboard operations.
pub type WiringResult<T> = Result<T, WiringError>;
