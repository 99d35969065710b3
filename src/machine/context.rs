//! The machine instance: current leaf, domain data and dispatch.

use crate::builder::MachineBuilder;
use crate::core::{
    Event, EventId, StateDescriptor, StateGraph, StateId, TransitionHistory, TransitionRecord,
};
use crate::machine::error::MachineError;
use crate::machine::transition::Transit;
use crate::router::{Router, RouterId};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// Hook invoked for events no state on the current path accepts.
pub type UnhandledHook<D, E> = Box<dyn FnMut(&mut D, &E) + Send>;

/// Outcome of a dispatched event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A handler ran and did not transition.
    Handled { source: StateId },

    /// A handler ran and the machine moved from one leaf to another (or
    /// re-entered the same leaf).
    Transitioned {
        source: StateId,
        from: StateId,
        to: StateId,
    },

    /// No state accepted the event; it went to the successor router.
    Forwarded { router: RouterId },

    /// No state accepted the event and there is no successor.
    Unhandled,
}

impl Dispatch {
    /// True if some state's handler ran.
    pub fn was_handled(&self) -> bool {
        matches!(self, Self::Handled { .. } | Self::Transitioned { .. })
    }
}

/// A running hierarchical state machine.
///
/// Shares an immutable [`StateGraph`] with any number of other machines and
/// owns the only mutable parts: the current leaf and the domain data.
/// Dispatch is synchronous and run-to-completion.
///
/// # Example
///
/// ```rust
/// use statetree::builder::StateBuilder;
/// use statetree::core::{EventId, StateGraph, StateId};
/// use statetree::machine::{Dispatch, Machine};
///
/// const TOP: StateId = StateId(0);
/// const IDLE: StateId = StateId(1);
/// const BUSY: StateId = StateId(2);
/// const GO: EventId = 0;
///
/// let graph = StateGraph::builder()
///     .state(StateBuilder::composite(TOP, "Top").default_child(IDLE))
///     .state(StateBuilder::leaf(IDLE, "Idle").parent(TOP).transition_on(GO, BUSY))
///     .state(StateBuilder::leaf(BUSY, "Busy").parent(TOP).on_entry(|n: &mut u32| *n += 1))
///     .build()
///     .unwrap();
///
/// let mut machine = Machine::new(graph, 0u32);
/// machine.start().unwrap();
///
/// let outcome = machine.dispatch(&GO).unwrap();
/// assert_eq!(outcome, Dispatch::Transitioned { source: IDLE, from: IDLE, to: BUSY });
/// assert_eq!(machine.current_state_id(), Some(BUSY));
/// assert_eq!(*machine.data(), 1);
/// ```
pub struct Machine<D, E> {
    pub(crate) graph: Arc<StateGraph<D, E>>,
    pub(crate) data: D,
    pub(crate) current: Option<StateId>,
    pub(crate) router_id: RouterId,
    pub(crate) unhandled: Option<UnhandledHook<D, E>>,
    pub(crate) successor: Option<Box<dyn Router<E> + Send>>,
    pub(crate) history: Option<TransitionHistory>,
}

impl<D, E: Event> Machine<D, E> {
    /// Create an unstarted machine with router id 0, no successor, no
    /// unhandled hook and no history.
    pub fn new(graph: impl Into<Arc<StateGraph<D, E>>>, data: D) -> Self {
        Self {
            graph: graph.into(),
            data,
            current: None,
            router_id: 0,
            unhandled: None,
            successor: None,
            history: None,
        }
    }

    /// Configure a machine through [`MachineBuilder`].
    pub fn builder(graph: impl Into<Arc<StateGraph<D, E>>>) -> MachineBuilder<D, E> {
        MachineBuilder::new(graph)
    }

    /// Enter the root and run its init cascade down to the first leaf.
    ///
    /// Starting an already started machine does nothing and returns the
    /// current leaf.
    pub fn start(&mut self) -> Result<StateId, MachineError> {
        if let Some(current) = self.current {
            return Ok(current);
        }

        let root = self.graph.root();
        let top = self
            .graph
            .state(root)
            .ok_or(MachineError::UnknownState(root))?;
        top.enter(&mut self.data);
        let leaf = self
            .graph
            .settle(root, &mut self.data)
            .ok_or(MachineError::UnknownState(root))?;

        tracing::info!(router = self.router_id, leaf = %self.graph.name(leaf), "machine started");
        self.current = Some(leaf);
        Ok(leaf)
    }

    /// Deliver `event` to the nearest state on the current path that
    /// declares a handler for it.
    ///
    /// Exactly one handler runs when any state on the path accepts the
    /// event. Otherwise the event goes to the successor router, or to the
    /// unhandled hook when there is none, and the state does not change.
    ///
    /// If a handler fails after it transitioned, the new leaf is kept and
    /// the error is returned.
    pub fn dispatch(&mut self, event: &E) -> Result<Dispatch, MachineError> {
        let current = self.current.ok_or(MachineError::NotStarted)?;
        let id = event.id();

        let Some((state, handler)) = self.graph.find_handler(current, id) else {
            return self.escalate(event);
        };
        let source = state.id();
        tracing::debug!(
            event = id,
            current = %self.graph.name(current),
            source = %state.name(),
            "dispatching event"
        );

        let mut transit = Transit::new(&self.graph, &mut self.data, current, source, id);
        let outcome = handler(&mut transit, event);
        let landed = transit.landed();

        let dispatch = match landed {
            Some(to) => {
                self.current = Some(to);
                if let Some(history) = self.history.as_mut() {
                    history.record(TransitionRecord {
                        event: id,
                        source,
                        from: current,
                        to,
                        timestamp: Utc::now(),
                    });
                }
                Dispatch::Transitioned {
                    source,
                    from: current,
                    to,
                }
            }
            None => Dispatch::Handled { source },
        };
        outcome.map(|()| dispatch)
    }

    fn escalate(&mut self, event: &E) -> Result<Dispatch, MachineError> {
        if let Some(successor) = self.successor.as_mut() {
            let router = successor.router_id();
            tracing::debug!(event = event.id(), router, "forwarding event to successor");
            successor.receive(event)?;
            return Ok(Dispatch::Forwarded { router });
        }

        tracing::debug!(event = event.id(), router = self.router_id, "unhandled event");
        if let Some(hook) = self.unhandled.as_mut() {
            hook(&mut self.data, event);
        }
        Ok(Dispatch::Unhandled)
    }

    /// Whether the current leaf or one of its ancestors declares a handler
    /// for `event`. Always false before [`Self::start`].
    ///
    /// A declared handler counts even if its guard rejects every
    /// transition.
    pub fn accepts(&self, event: EventId) -> bool {
        self.current
            .is_some_and(|current| self.graph.accepts(current, event))
    }

    /// Overwrite the current leaf without running any exit or entry
    /// action.
    ///
    /// Meant for tests and fault recovery only. Marks the machine started.
    pub fn force_state(&mut self, id: StateId) -> Result<(), MachineError> {
        let state = self.graph.state(id).ok_or(MachineError::UnknownState(id))?;
        if !state.is_leaf() {
            return Err(MachineError::NotALeaf(id));
        }
        tracing::warn!(
            from = ?self.current,
            to = %state.name(),
            "forcing state without exit or entry actions"
        );
        self.current = Some(id);
        Ok(())
    }

    /// Route unaccepted events to `successor` from now on.
    pub fn set_successor<R>(&mut self, successor: R)
    where
        R: Router<E> + Send + 'static,
    {
        self.successor = Some(Box::new(successor));
    }

    pub fn clear_successor(&mut self) {
        self.successor = None;
    }

    pub fn has_successor(&self) -> bool {
        self.successor.is_some()
    }
}

impl<D, E> Machine<D, E> {
    pub fn is_started(&self) -> bool {
        self.current.is_some()
    }

    /// Current leaf, `None` before [`Self::start`].
    pub fn current_state_id(&self) -> Option<StateId> {
        self.current
    }

    pub fn current_state(&self) -> Option<&StateDescriptor<D, E>> {
        self.current.and_then(|id| self.graph.state(id))
    }

    /// True if the current leaf is `state` or lies below it.
    pub fn is_in(&self, state: StateId) -> bool {
        self.current
            .is_some_and(|current| self.graph.is_within(current, state))
    }

    pub fn graph(&self) -> &Arc<StateGraph<D, E>> {
        &self.graph
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }

    /// Completed transitions, if history was enabled.
    pub fn history(&self) -> Option<&TransitionHistory> {
        self.history.as_ref()
    }
}

impl<D, E: Event> Router<E> for Machine<D, E> {
    fn router_id(&self) -> RouterId {
        self.router_id
    }

    fn accepts(&self, event: EventId) -> bool {
        Machine::accepts(self, event)
    }

    fn receive(&mut self, event: &E) -> Result<Dispatch, MachineError> {
        self.dispatch(event)
    }
}

impl<D: fmt::Debug, E> fmt::Debug for Machine<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("router_id", &self.router_id)
            .field("current", &self.current)
            .field("data", &self.data)
            .field("successor", &self.successor.is_some())
            .finish_non_exhaustive()
    }
}
