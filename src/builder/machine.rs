//! Builder for configuring machine instances.

use crate::builder::error::BuildError;
use crate::core::{Event, StateGraph, TransitionHistory};
use crate::machine::{Machine, UnhandledHook};
use crate::router::{Router, RouterId, MAX_ROUTER_ID};
use std::sync::Arc;

/// Fluent configuration of a [`Machine`] over a shared graph.
pub struct MachineBuilder<D, E> {
    graph: Arc<StateGraph<D, E>>,
    data: Option<D>,
    router_id: RouterId,
    unhandled: Option<UnhandledHook<D, E>>,
    successor: Option<Box<dyn Router<E> + Send>>,
    history_capacity: Option<usize>,
}

impl<D, E: Event> MachineBuilder<D, E> {
    /// Create a builder for a machine over `graph`.
    pub fn new(graph: impl Into<Arc<StateGraph<D, E>>>) -> Self {
        Self {
            graph: graph.into(),
            data: None,
            router_id: 0,
            unhandled: None,
            successor: None,
            history_capacity: None,
        }
    }

    /// Set the domain data (required).
    pub fn data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the router id. Must not exceed [`MAX_ROUTER_ID`].
    pub fn router_id(mut self, id: RouterId) -> Self {
        self.router_id = id;
        self
    }

    /// Hook for events nobody on the current path accepts. Not called for
    /// events forwarded to a successor.
    pub fn on_unhandled<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut D, &E) + Send + 'static,
    {
        self.unhandled = Some(Box::new(hook));
        self
    }

    /// Router receiving events nobody on the current path accepts.
    pub fn successor<R>(mut self, successor: R) -> Self
    where
        R: Router<E> + Send + 'static,
    {
        self.successor = Some(Box::new(successor));
        self
    }

    /// Keep the last `capacity` transitions.
    pub fn history(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    /// Build the (unstarted) machine.
    pub fn build(self) -> Result<Machine<D, E>, BuildError> {
        let data = self.data.ok_or(BuildError::MissingData)?;
        if self.router_id > MAX_ROUTER_ID {
            return Err(BuildError::ReservedRouterId(self.router_id));
        }

        Ok(Machine {
            graph: self.graph,
            data,
            current: None,
            router_id: self.router_id,
            unhandled: self.unhandled,
            successor: self.successor,
            history: self.history_capacity.map(TransitionHistory::with_capacity),
        })
    }
}
