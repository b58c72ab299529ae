/*! Core value types shared across the dispatcher, connectors and composition. */

#![allow(missing_docs)]

mod error;
mod event;
mod event_map;
mod ids;

pub use error::{WiringError, WiringResult};
pub use event::Event;
pub use event_map::{Binding, EventMap, MethodRef, Subscription};
pub use ids::ServiceId;
