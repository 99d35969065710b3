//! The frozen state tree and its ancestry queries.

use crate::builder::StateGraphBuilder;
use crate::core::event::EventId;
use crate::core::state::{Handler, StateDescriptor, StateId};
use std::fmt;

/// Registry of immutable state descriptors indexed by [`StateId`].
///
/// A graph is validated once by [`StateGraphBuilder::build`] and never
/// changes afterwards, so one graph can back any number of machines,
/// including machines living on different threads.
pub struct StateGraph<D, E> {
    pub(crate) states: Vec<Option<StateDescriptor<D, E>>>,
    pub(crate) root: StateId,
    pub(crate) len: usize,
}

impl<D, E> StateGraph<D, E> {
    /// Start declaring a new graph.
    pub fn builder() -> StateGraphBuilder<D, E> {
        StateGraphBuilder::new()
    }

    /// The single parentless composite ("Top").
    pub fn root(&self) -> StateId {
        self.root
    }

    /// Number of declared states.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.state(id).is_some()
    }

    /// Look up a descriptor.
    pub fn state(&self, id: StateId) -> Option<&StateDescriptor<D, E>> {
        self.states.get(id.index()).and_then(Option::as_ref)
    }

    /// Display name of a state, or `"?"` for unknown ids.
    pub fn name(&self, id: StateId) -> &str {
        self.state(id).map_or("?", StateDescriptor::name)
    }

    /// All descriptors in id order.
    pub fn iter(&self) -> impl Iterator<Item = &StateDescriptor<D, E>> {
        self.states.iter().flatten()
    }

    /// True if `state` is `ancestor` or one of its descendants.
    ///
    /// Constant time: the ancestor at a given depth is read straight out of
    /// the precomputed root path. Unknown ids are never within anything.
    pub fn is_within(&self, state: StateId, ancestor: StateId) -> bool {
        match (self.state(state), self.state(ancestor)) {
            (Some(node), Some(outer)) => node.path.get(outer.depth()) == Some(&ancestor),
            _ => false,
        }
    }

    /// Same as [`Self::is_within`] with `None` standing for the virtual
    /// super-root above the root: everything is within it and it is within
    /// nothing but itself.
    pub(crate) fn is_within_opt(&self, state: Option<StateId>, ancestor: Option<StateId>) -> bool {
        match (state, ancestor) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(state), Some(ancestor)) => self.is_within(state, ancestor),
        }
    }

    /// True if `state` or any of its ancestors declares a handler for `event`.
    pub fn accepts(&self, state: StateId, event: EventId) -> bool {
        self.find_handler(state, event).is_some()
    }

    /// Nearest state on the path from `state` to the root that declares a
    /// handler for `event`, together with that handler.
    pub(crate) fn find_handler(
        &self,
        state: StateId,
        event: EventId,
    ) -> Option<(&StateDescriptor<D, E>, &Handler<D, E>)> {
        let node = self.state(state)?;
        node.path.iter().rev().find_map(|id| {
            let level = self.state(*id)?;
            level.handler(event).map(|handler| (level, handler))
        })
    }

    /// Leaf reached by following default children from `state`, without
    /// running any action.
    pub fn default_leaf(&self, state: StateId) -> Option<StateId> {
        let mut id = state;
        for _ in 0..=self.len {
            let node = self.state(id)?;
            match node.default_child {
                Some(child) if node.is_composite() => id = child,
                _ => return node.is_leaf().then_some(id),
            }
        }
        None
    }

    /// States from `state` down its default-child chain to a leaf.
    ///
    /// A slice of the leaf's root path, so it costs nothing to produce.
    pub(crate) fn cascade(&self, state: StateId) -> Option<&[StateId]> {
        let depth = self.state(state)?.depth();
        let leaf = self.default_leaf(state)?;
        self.state(leaf)?.path.get(depth..)
    }

    /// Run the init cascade below `state` and return the leaf it settles on.
    ///
    /// For every composite on the way: its init hook, then the default
    /// child's entry. The entry of `state` itself is the caller's job.
    pub(crate) fn settle(&self, state: StateId, data: &mut D) -> Option<StateId> {
        let chain = self.cascade(state)?;
        for pair in chain.windows(2) {
            if let (Some(parent), Some(child)) = (self.state(pair[0]), self.state(pair[1])) {
                parent.init(data);
                child.enter(data);
            }
        }
        chain.last().copied()
    }
}

impl<D, E> fmt::Debug for StateGraph<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateGraph")
            .field("root", &self.root)
            .field("states", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
