/*!
Composition: turning tagged declarations into dispatcher registrations.

The pass runs in two phases:

1. **Plan** - every declaration is validated against the [`Config`] and the
   [`TypeCatalog`]. Any configuration error aborts before the dispatcher is
   touched.
2. **Apply** - declarations are registered in input order. Listener and
   subscriber declarations only add pending registrations; connector
   declarations resolve the connector to read its event map.

# Module Structure

- `declaration.rs` - serde model of the tagged declarations
- `catalog.rs` - declared type names and their capabilities
- `method_name.rs` - `kernel.request` → `onKernelRequest`
*/

mod catalog;
mod declaration;
mod method_name;

pub use catalog::{TypeCatalog, TypeDescriptor};
pub use declaration::{declarations_from_json, Declaration};
pub use method_name::derive_method_name;

use crate::config::Config;
use crate::core::Dispatcher;
use crate::locator::{Service, ServiceStub};
use crate::types::{EventMap, ServiceId, WiringError, WiringResult};

/// A validated declaration, ready to register.
enum Step<'d> {
  Listener {
    id: &'d ServiceId,
    event: &'d str,
    method: String,
    priority: i32,
  },
  Subscriber {
    id: &'d ServiceId,
    events: EventMap,
  },
  Connector {
    id: &'d ServiceId,
    listener: Option<&'d ServiceId>,
  },
}

/// Registers declared listeners, subscribers and connectors with a dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct RegisterListenersPass<'a> {
  config: &'a Config,
  catalog: &'a TypeCatalog,
}

impl<'a> RegisterListenersPass<'a> {
  /// Pass using `config` and the types in `catalog`.
  pub const fn new(config: &'a Config, catalog: &'a TypeCatalog) -> Self {
    Self { config, catalog }
  }

  /// Validate every declaration, then register them in order.
  ///
  /// Configuration errors are detected before anything is registered. A
  /// locator error while attaching a connector stops the pass; declarations
  /// before it stay registered.
  pub fn process(&self, dispatcher: &Dispatcher, declarations: &[Declaration]) -> WiringResult<()> {
    let steps = declarations
      .iter()
      .map(|declaration| self.plan(declaration))
      .collect::<WiringResult<Vec<_>>>()?;

    for step in steps {
      Self::apply(dispatcher, step)?;
    }

    log::debug!("Registered {} declaration(s)", declarations.len());
    Ok(())
  }

  fn plan<'d>(&self, declaration: &'d Declaration) -> WiringResult<Step<'d>> {
    match declaration {
      Declaration::Listener {
        id,
        event,
        method,
        priority,
      } => {
        let event = event
          .as_deref()
          .ok_or_else(|| WiringError::configuration(id, "listener declaration must define \"event\""))?;
        let method = match method {
          Some(method) => method.clone(),
          None if self.config.derive_method_names => {
            derive_method_name(&self.config.method_prefix, event)
          }
          None => {
            return Err(WiringError::configuration(
              id,
              "listener declaration must define \"method\"",
            ))
          }
        };
        Ok(Step::Listener {
          id,
          event,
          method,
          priority: priority.unwrap_or(0),
        })
      }

      Declaration::Subscriber { id, declared_type } => {
        let events = self
          .descriptor(id, declared_type)?
          .subscribed_events()
          .ok_or_else(|| {
            WiringError::configuration(id, format!("type \"{declared_type}\" is not a subscriber"))
          })?;
        Ok(Step::Subscriber { id, events })
      }

      Declaration::Connector {
        id,
        declared_type,
        listener,
      } => {
        if !self.descriptor(id, declared_type)?.is_connector() {
          return Err(WiringError::configuration(
            id,
            format!("type \"{declared_type}\" is not a connector"),
          ));
        }
        Ok(Step::Connector {
          id,
          listener: listener.as_ref(),
        })
      }
    }
  }

  fn descriptor(&self, id: &ServiceId, declared_type: &str) -> WiringResult<&'a TypeDescriptor> {
    self
      .catalog
      .get(declared_type)
      .ok_or_else(|| WiringError::configuration(id, format!("unknown type \"{declared_type}\"")))
  }

  fn apply(dispatcher: &Dispatcher, step: Step<'_>) -> WiringResult<()> {
    match step {
      Step::Listener {
        id,
        event,
        method,
        priority,
      } => dispatcher.add_listener_service(event, id, method, priority),

      Step::Subscriber { id, events } => dispatcher.add_subscriber_service(id, &events),

      Step::Connector { id, listener } => {
        if let Some(listener) = listener {
          match dispatcher.locator().resolve(id)? {
            Service::Connector(connector) => {
              connector.set_deferred_listener(ServiceStub::new(dispatcher.locator(), listener));
            }
            Service::Listener(_) => {
              return Err(WiringError::configuration(id, "service is not a connector"));
            }
          }
        }
        dispatcher.add_connector_service(id)?;
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::connector::Connector;
  use crate::locator::{Container, ServiceLocator};
  use crate::testing::{CallLog, CountingLocator, Recorder, RouterSubscriber};
  use std::sync::Arc;

  fn catalog() -> TypeCatalog {
    TypeCatalog::new()
      .with(TypeDescriptor::subscriber::<RouterSubscriber>("app.Router"))
      .with(TypeDescriptor::connector("Connector"))
      .with(TypeDescriptor::listener("app.Plain"))
  }

  fn run(declarations: &[Declaration]) -> WiringResult<Dispatcher> {
    run_with(&Config::default(), declarations)
  }

  fn run_with(config: &Config, declarations: &[Declaration]) -> WiringResult<Dispatcher> {
    let dispatcher = Dispatcher::new(Arc::new(Container::new()));
    RegisterListenersPass::new(config, &catalog()).process(&dispatcher, declarations)?;
    Ok(dispatcher)
  }

  fn assert_configuration(result: WiringResult<Dispatcher>, expected_id: &str, reason_part: &str) {
    match result {
      Err(WiringError::Configuration { id, reason }) => {
        assert_eq!(id.as_str(), expected_id);
        assert!(reason.contains(reason_part), "unexpected reason: {reason}");
      }
      other => panic!("expected configuration error, got {other:?}"),
    }
  }

  #[test]
  fn listener_method_is_derived_from_event() {
    let dispatcher = run(&[Declaration::listener("app.svc", "kernel.request")]).unwrap();

    let pending = dispatcher.pending_listeners("kernel.request");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].method, "onKernelRequest");
    assert_eq!(pending[0].priority, 0);
  }

  #[test]
  fn listener_keeps_explicit_method_and_priority() {
    let dispatcher = run(&[Declaration::Listener {
      id: "app.svc".into(),
      event: Some("kernel.request".into()),
      method: Some("handle".into()),
      priority: Some(-3),
    }])
    .unwrap();

    let pending = dispatcher.pending_listeners("kernel.request");
    assert_eq!(pending[0].method, "handle");
    assert_eq!(pending[0].priority, -3);
  }

  #[test]
  fn custom_prefix_is_used() {
    let config = Config {
      method_prefix: "handle".into(),
      ..Config::default()
    };
    let dispatcher = run_with(&config, &[Declaration::listener("app.svc", "order.placed")]).unwrap();
    assert_eq!(dispatcher.pending_listeners("order.placed")[0].method, "handleOrderPlaced");
  }

  #[test]
  fn listener_without_event_is_rejected() {
    let result = run(&[Declaration::Listener {
      id: "app.svc".into(),
      event: None,
      method: Some("handle".into()),
      priority: None,
    }]);
    assert_configuration(result, "app.svc", "\"event\"");
  }

  #[test]
  fn missing_method_is_rejected_when_derivation_is_off() {
    let config = Config {
      derive_method_names: false,
      ..Config::default()
    };
    let result = run_with(&config, &[Declaration::listener("app.svc", "kernel.request")]);
    assert_configuration(result, "app.svc", "\"method\"");
  }

  #[test]
  fn subscriber_declaration_uses_type_map() {
    let dispatcher = run(&[Declaration::subscriber("app.router", "app.Router")]).unwrap();

    let request = dispatcher.pending_listeners("kernel.request");
    assert_eq!(request[0].service.as_str(), "app.router");
    assert_eq!(request[0].method, "onRequest");
    assert_eq!(request[0].priority, 10);
    assert_eq!(dispatcher.pending_listeners("kernel.response")[0].priority, 0);
  }

  #[test]
  fn subscriber_type_must_be_known_and_capable() {
    assert_configuration(
      run(&[Declaration::subscriber("app.x", "app.Missing")]),
      "app.x",
      "unknown type",
    );
    assert_configuration(
      run(&[Declaration::subscriber("app.x", "app.Plain")]),
      "app.x",
      "not a subscriber",
    );
  }

  #[test]
  fn connector_type_must_be_a_connector() {
    assert_configuration(
      run(&[Declaration::connector("app.x", "app.Router", None)]),
      "app.x",
      "not a connector",
    );
  }

  #[test]
  fn configuration_errors_register_nothing() {
    let dispatcher = Dispatcher::new(Arc::new(Container::new()));
    let err = RegisterListenersPass::new(&Config::default(), &catalog()).process(
      &dispatcher,
      &[
        Declaration::listener("app.ok", "kernel.request"),
        Declaration::subscriber("app.bad", "app.Missing"),
      ],
    );
    assert!(err.is_err());
    assert!(!dispatcher.has_any_listeners());
  }

  #[test]
  fn connector_declaration_installs_deferred_listener() {
    let log = CallLog::default();
    let target_log = log.clone();
    let container = Container::new();
    container.set(
      "app.conn",
      Service::Connector(Arc::new(Connector::new(EventMap::new().on("e", "onE")))),
    );
    container.register("app.target", move |_: &Container| {
      Service::listener(Recorder::with_log("target", &target_log))
    });
    let counting = Arc::new(CountingLocator::new(container));
    let locator: Arc<dyn ServiceLocator> = counting.clone();
    let dispatcher = Dispatcher::new(locator);

    RegisterListenersPass::new(&Config::default(), &catalog())
      .process(
        &dispatcher,
        &[Declaration::connector("app.conn", "Connector", Some("app.target".into()))],
      )
      .unwrap();

    assert_eq!(counting.resolutions("app.target"), 0);
    dispatcher.dispatch("e", None).unwrap();
    dispatcher.dispatch("e", None).unwrap();
    assert_eq!(log.take(), ["target::onE", "target::onE"]);
    assert_eq!(counting.resolutions("app.target"), 1);
  }

  #[test]
  fn connector_declaration_for_plain_service_fails_on_apply() {
    let container = Arc::new(Container::new());
    container.set("app.conn", Service::listener(Recorder::new("plain").0));
    let dispatcher = Dispatcher::new(container);

    let err = RegisterListenersPass::new(&Config::default(), &catalog())
      .process(
        &dispatcher,
        &[Declaration::connector("app.conn", "Connector", Some("app.target".into()))],
      )
      .unwrap_err();
    assert!(matches!(err, WiringError::Configuration { .. }));
  }
}
