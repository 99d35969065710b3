//! Statetree: hierarchical, event-driven state machines
//!
//! A machine is a static tree of states. Each state declares which event
//! ids it handles; an event travels from the current leaf towards the root
//! until some state handles it. When a handler transitions, the engine runs
//! the UML exit and entry sequence implied by where the current leaf, the
//! declaring state and the target sit in the tree, then follows default
//! children down to a leaf.
//!
//! # Core Concepts
//!
//! - **StateGraph**: immutable, validated tree of state descriptors shared
//!   by any number of machines
//! - **Machine**: one instance; owns the current leaf and the domain data
//! - **Transit**: scope handed to handlers for triggering a transition
//! - **TransitionPlan**: inspectable exit/entry/init sequence
//!
//! # Example
//!
//! ```rust
//! use statetree::builder::StateBuilder;
//! use statetree::core::{EventId, StateGraph, StateId};
//! use statetree::machine::Machine;
//!
//! const TOP: StateId = StateId(0);
//! const PARKED: StateId = StateId(1);
//! const DRIVING: StateId = StateId(2);
//! const CRUISE: StateId = StateId(3);
//! const MANUAL: StateId = StateId(4);
//!
//! const START: EventId = 0;
//! const CRUISE_ON: EventId = 1;
//! const STOP: EventId = 2;
//!
//! let graph = StateGraph::builder()
//!     .state(StateBuilder::composite(TOP, "Top").default_child(PARKED))
//!     .state(StateBuilder::leaf(PARKED, "Parked").parent(TOP).transition_on(START, DRIVING))
//!     .state(
//!         StateBuilder::composite(DRIVING, "Driving")
//!             .parent(TOP)
//!             .default_child(MANUAL)
//!             .on_exit(|log: &mut Vec<&'static str>| log.push("exit Driving"))
//!             .transition_on(STOP, PARKED),
//!     )
//!     .state(
//!         StateBuilder::leaf(MANUAL, "Manual")
//!             .parent(DRIVING)
//!             .transition_on(CRUISE_ON, CRUISE),
//!     )
//!     .state(StateBuilder::leaf(CRUISE, "Cruise").parent(DRIVING))
//!     .build()
//!     .unwrap();
//!
//! let mut machine = Machine::new(graph, Vec::new());
//! machine.start().unwrap();
//! machine.dispatch(&START).unwrap();
//! machine.dispatch(&CRUISE_ON).unwrap();
//! assert_eq!(machine.current_state_id(), Some(CRUISE));
//!
//! // Handled by the inherited Driving handler.
//! machine.dispatch(&STOP).unwrap();
//! assert_eq!(machine.current_state_id(), Some(PARKED));
//! assert_eq!(machine.data(), &vec!["exit Driving"]);
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod router;

// Re-export commonly used types
pub use self::builder::{BuildError, MachineBuilder, StateBuilder, StateGraphBuilder};
pub use self::core::{Event, EventId, Guard, StateGraph, StateId, StateKind};
pub use self::machine::{Dispatch, Machine, MachineError, Transit, TransitionPlan};
pub use self::router::{Router, RouterId};
