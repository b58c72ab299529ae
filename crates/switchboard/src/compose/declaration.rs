/*!
Tagged service declarations.

```json
[
  { "tag": "listener",   "id": "app.audit", "event": "kernel.request", "priority": -10 },
  { "tag": "subscriber", "id": "app.router", "type": "app.Router" },
  { "tag": "connector",  "id": "app.conn", "type": "Connector", "listener": "app.target" }
]
```
*/

use serde::{Deserialize, Serialize};

use crate::types::{ServiceId, WiringResult};

/// One tagged service, as read by the composition pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Declaration {
  /// Bind one method of `id` to one event.
  Listener {
    /// Declared service.
    id: ServiceId,
    /// Required; a missing event is a configuration error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event: Option<String>,
    /// Derived from the event name when missing (see [`Config`](crate::Config)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    /// Default: 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<i32>,
  },
  /// Register `id` with the event map of its subscriber type.
  Subscriber {
    /// Declared service.
    id: ServiceId,
    /// Name looked up in the [`TypeCatalog`](crate::TypeCatalog).
    #[serde(rename = "type")]
    declared_type: String,
  },
  /// Register the connector `id`, optionally pointing it at a lazily
  /// resolved `listener` service.
  Connector {
    /// Declared service.
    id: ServiceId,
    /// Name looked up in the [`TypeCatalog`](crate::TypeCatalog).
    #[serde(rename = "type")]
    declared_type: String,
    /// Service resolved lazily as the connector's listener.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    listener: Option<ServiceId>,
  },
}

impl Declaration {
  /// A listener declaration with derived method and default priority.
  pub fn listener(id: impl Into<ServiceId>, event: impl Into<String>) -> Self {
    Self::Listener {
      id: id.into(),
      event: Some(event.into()),
      method: None,
      priority: None,
    }
  }

  /// A subscriber declaration.
  pub fn subscriber(id: impl Into<ServiceId>, declared_type: impl Into<String>) -> Self {
    Self::Subscriber {
      id: id.into(),
      declared_type: declared_type.into(),
    }
  }

  /// A connector declaration.
  pub fn connector(
    id: impl Into<ServiceId>,
    declared_type: impl Into<String>,
    listener: Option<ServiceId>,
  ) -> Self {
    Self::Connector {
      id: id.into(),
      declared_type: declared_type.into(),
      listener,
    }
  }

  /// The declared service.
  pub const fn id(&self) -> &ServiceId {
    match self {
      Self::Listener { id, .. } | Self::Subscriber { id, .. } | Self::Connector { id, .. } => id,
    }
  }
}

/// Parse a JSON array of declarations.
pub fn declarations_from_json(json: &str) -> WiringResult<Vec<Declaration>> {
  Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::WiringError;

  #[test]
  fn parses_every_tag() {
    let declarations = declarations_from_json(
      r#"[
        { "tag": "listener", "id": "app.audit", "event": "kernel.request", "priority": -10 },
        { "tag": "listener", "id": "app.log", "event": "kernel.response", "method": "write" },
        { "tag": "subscriber", "id": "app.router", "type": "app.Router" },
        { "tag": "connector", "id": "app.conn", "type": "Connector", "listener": "app.target" },
        { "tag": "connector", "id": "app.bare", "type": "Connector" }
      ]"#,
    )
    .unwrap();

    assert_eq!(
      declarations,
      [
        Declaration::Listener {
          id: "app.audit".into(),
          event: Some("kernel.request".into()),
          method: None,
          priority: Some(-10),
        },
        Declaration::Listener {
          id: "app.log".into(),
          event: Some("kernel.response".into()),
          method: Some("write".into()),
          priority: None,
        },
        Declaration::subscriber("app.router", "app.Router"),
        Declaration::connector("app.conn", "Connector", Some("app.target".into())),
        Declaration::connector("app.bare", "Connector", None),
      ]
    );
  }

  #[test]
  fn listener_without_event_still_parses() {
    let declarations = declarations_from_json(r#"[{ "tag": "listener", "id": "app.x" }]"#).unwrap();
    assert!(matches!(&declarations[0], Declaration::Listener { event: None, .. }));
    assert_eq!(declarations[0].id().as_str(), "app.x");
  }

  #[test]
  fn unknown_tag_is_rejected() {
    let err = declarations_from_json(r#"[{ "tag": "router", "id": "app.x" }]"#).unwrap_err();
    assert!(matches!(err, WiringError::InvalidDeclarations(_)));
  }

  #[test]
  fn serializes_with_type_key() {
    let json = serde_json::to_value(Declaration::subscriber("app.router", "app.Router")).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "tag": "subscriber", "id": "app.router", "type": "app.Router" })
    );
  }
}
