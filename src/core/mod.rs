//! Core state tree types.
//!
//! This module contains the static half of a state machine:
//! - Event identity via the `Event` trait
//! - Immutable state descriptors and the validated `StateGraph`
//! - Guard predicates for conditional transitions
//! - Bounded transition history
//!
//! Nothing here holds a current state. That lives in
//! [`crate::machine::Machine`].

mod event;
mod graph;
mod guard;
mod history;
mod state;

pub use event::{Event, EventId};
pub use graph::StateGraph;
pub use guard::Guard;
pub use history::{TransitionHistory, TransitionRecord};
pub use state::{Action, Handler, StateDescriptor, StateId, StateKind};
