//! Running machines: dispatch and transitions.
//!
//! This module is the imperative half around the immutable graph. A
//! [`Machine`] holds the current leaf and the domain data; dispatching an
//! event finds the nearest declaring handler and hands it a [`Transit`]
//! scope through which it may trigger one transition.
//!
//! # Key Concepts
//!
//! - **Dispatch**: escalation from the current leaf towards the root
//! - **Transitions**: exit and entry lists computed from static root paths
//! - **Run-to-completion**: every exit, entry and init runs before
//!   `dispatch` returns

mod context;
mod error;
mod transition;

pub use context::{Dispatch, Machine, UnhandledHook};
pub use error::{HandlerResult, MachineError};
pub use transition::{Step, Transit, TransitionPlan};
