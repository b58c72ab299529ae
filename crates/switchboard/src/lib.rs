/*!
Switchboard - service-backed event dispatch

Listeners are registered as service ids and only built when their event
first fires. Connectors group several event bindings behind one service
whose listener can be swapped or resolved lazily.

```ignore
use switchboard::{Container, Dispatcher, Service};

let container = Arc::new(Container::new());
container.register("app.router", |_: &Container| Service::listener(Arc::new(Router::default())));

let dispatcher = Dispatcher::new(container.clone());

// Nothing is built yet
dispatcher.add_listener_service("kernel.request", "app.router", "onKernelRequest", 0);
dispatcher.add_subscriber_service_for::<Router>("app.router");

// Router is built here, once, and reused by later dispatches
let event = dispatcher.dispatch("kernel.request", Some(Event::with_data(json!({ "path": "/" }))))?;

// Or compose from declarations
let dispatcher = Dispatcher::builder(container)
    .catalog(TypeCatalog::new().with(TypeDescriptor::subscriber::<Router>("app.Router")))
    .declarations(declarations_from_json(r#"[{ "tag": "subscriber", "id": "app.router", "type": "app.Router" }]"#)?)
    .build()?;
```
*/

mod config;
mod connected;
mod connector;
mod core;
mod listener;
mod locator;

pub mod compose;

#[cfg(test)]
mod testing;

mod types;
pub use types::*;

pub use crate::compose::{declarations_from_json, Declaration, TypeCatalog, TypeDescriptor};
pub use crate::config::Config;
pub use crate::connected::ConnectedListener;
pub use crate::connector::Connector;
pub use crate::core::{Dispatcher, DispatcherBuilder, PendingListener};
pub use crate::listener::{same_instance, Callback, Listener, ListenerFn, Subscriber};
pub use crate::locator::{Container, Service, ServiceLocator, ServiceStub};
