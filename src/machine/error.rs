//! Runtime errors raised while driving a machine.

use crate::core::StateId;
use thiserror::Error;

/// Errors that can occur while starting, dispatching or transitioning.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("Machine has not been started. Call .start() before dispatching")]
    NotStarted,

    #[error("State {0} is not part of the graph")]
    UnknownState(StateId),

    #[error("State {0} is a composite and cannot be current")]
    NotALeaf(StateId),

    #[error("Declaring state {declared} is not an ancestor of current state {current}")]
    SourceNotAncestor { declared: StateId, current: StateId },

    #[error("Handler of {declared} already transitioned to {landed} during this dispatch")]
    TransitionAlreadyTaken { declared: StateId, landed: StateId },

    #[error("Handler failed: {0}")]
    Handler(String),
}

/// Value returned by event handlers.
pub type HandlerResult = Result<(), MachineError>;
