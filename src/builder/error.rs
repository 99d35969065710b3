//! Build errors for state graphs and machines.

use crate::core::{EventId, StateId};
use crate::router::RouterId;
use thiserror::Error;

/// Malformed topology or configuration, caught before any machine runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Graph has no states. Add at least a composite root")]
    EmptyGraph,

    #[error("State {0} is declared more than once")]
    DuplicateState(StateId),

    #[error("State {state} names unknown parent {parent}")]
    UnknownParent { state: StateId, parent: StateId },

    #[error("No root state. Exactly one state must have no parent")]
    MissingRoot,

    #[error("States {first} and {second} both lack a parent")]
    MultipleRoots { first: StateId, second: StateId },

    #[error("Root {0} must be a composite state")]
    RootNotComposite(StateId),

    #[error("Parent chain of {0} loops back on itself")]
    ParentCycle(StateId),

    #[error("Composite {0} has no default child. Call .default_child(id)")]
    MissingDefaultChild(StateId),

    #[error("Default child {child} of {state} is not one of its direct children")]
    InvalidDefaultChild { state: StateId, child: StateId },

    #[error("Leaf {0} cannot have a default child")]
    LeafWithDefaultChild(StateId),

    #[error("Leaf {leaf} cannot be the parent of {child}")]
    LeafWithChildren { leaf: StateId, child: StateId },

    #[error("State {state} declares event {event} more than once")]
    DuplicateHandler { state: StateId, event: EventId },

    #[error("Router id {0} is reserved")]
    ReservedRouterId(RouterId),

    #[error("Machine data not specified. Call .data(value) before .build()")]
    MissingData,
}
