//! Boundary towards message routing layers.
//!
//! A publish/subscribe layer only needs to know whether a receiver accepts
//! an event id and how to hand the event over. Machines implement
//! [`Router`], and a machine can name another router as its successor: an
//! event no state accepts is forwarded there instead of being dropped.

use crate::core::{Event, EventId};
use crate::machine::{Dispatch, MachineError};

/// Identifier of a router. Values above [`MAX_ROUTER_ID`] are reserved.
pub type RouterId = u8;

/// Largest id an ordinary router may use.
pub const MAX_ROUTER_ID: RouterId = 249;

/// Reserved for a router standing in for "all routers".
pub const ALL_ROUTERS: RouterId = 253;

/// Reserved for a message bus.
pub const MESSAGE_BUS: RouterId = 254;

/// Reserved for a router that swallows everything.
pub const NULL_ROUTER: RouterId = 255;

/// Receiver of events, addressed by id.
pub trait Router<E: Event> {
    fn router_id(&self) -> RouterId;

    /// Whether an event with this id would be handled.
    fn accepts(&self, event: EventId) -> bool;

    /// Deliver an event.
    fn receive(&mut self, event: &E) -> Result<Dispatch, MachineError>;
}

/// Router that accepts nothing and drops whatever it receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullRouter;

impl<E: Event> Router<E> for NullRouter {
    fn router_id(&self) -> RouterId {
        NULL_ROUTER
    }

    fn accepts(&self, _event: EventId) -> bool {
        false
    }

    fn receive(&mut self, event: &E) -> Result<Dispatch, MachineError> {
        tracing::trace!(event = event.id(), "null router dropped event");
        Ok(Dispatch::Unhandled)
    }
}
