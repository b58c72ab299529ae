/*!
Service-backed registrations.

Nothing here resolves a service for dispatch purposes: every registration
becomes a [`PendingListener`] that the loader resolves the first time its
event is dispatched or listed. The exception is
[`Dispatcher::add_connector_service`], which must look the connector up to
read its event map.
*/

use std::sync::Arc;

use super::registry::PendingListener;
use super::Dispatcher;
use crate::connector::Connector;
use crate::listener::Subscriber;
use crate::locator::Service;
use crate::types::{EventMap, ServiceId, WiringError, WiringResult};

impl Dispatcher {
  /// Register `service::method` for `event` without resolving the service.
  pub fn add_listener_service(
    &self,
    event: &str,
    service: impl Into<ServiceId>,
    method: impl Into<String>,
    priority: i32,
  ) {
    let pending = PendingListener {
      service: service.into(),
      method: method.into(),
      priority,
    };
    log::debug!(
      "Pending listener {}::{} for \"{event}\" (priority {priority})",
      pending.service,
      pending.method
    );
    self.write(|r| r.add_pending(event, pending));
  }

  /// Register every binding of `events` against `service`.
  pub fn add_subscriber_service(&self, service: impl Into<ServiceId>, events: &EventMap) {
    let service = service.into();
    for (event, binding) in events.bindings() {
      self.add_listener_service(event, &service, binding.method, binding.priority);
    }
  }

  /// Register the bindings `S` declares against `service`.
  ///
  /// The service is expected to resolve to an `S`; that is not checked until
  /// the first dispatch calls into it.
  pub fn add_subscriber_service_for<S: Subscriber>(&self, service: impl Into<ServiceId>) {
    self.add_subscriber_service(service, &S::subscribed_events());
  }

  /// Resolve the connector `service`, register its bindings under its own id
  /// and attach it to this dispatcher.
  ///
  /// Fails with a configuration error when `service` is not a connector.
  pub fn add_connector_service(&self, service: impl Into<ServiceId>) -> WiringResult<Arc<Connector>> {
    let service = service.into();
    let connector = match self.locator.resolve(&service)? {
      Service::Connector(connector) => connector,
      Service::Listener(_) => {
        return Err(WiringError::configuration(&service, "service is not a connector"));
      }
    };

    self.add_subscriber_service(&service, connector.subscribed_events());
    connector.attach(self);
    log::debug!(
      "Connector {service} attached with {} event(s)",
      connector.subscribed_events().len()
    );
    Ok(connector)
  }
}
