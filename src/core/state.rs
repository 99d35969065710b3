//! State descriptors: the immutable nodes of a state tree.
//!
//! A descriptor answers two questions for the dispatcher: does this node
//! declare a handler for an event id, and which handler is it. Parent links
//! and the precomputed root path let the transition planner test ancestry
//! without walking or allocating.

use crate::core::event::EventId;
use crate::machine::{HandlerResult, Transit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a state.
///
/// Ids index the graph registry directly, so small dense values keep the
/// registry small.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub u16);

impl StateId {
    /// Wrap a raw id.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Position of this id in the graph registry.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a node may have children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Internal node with a default child. Never current.
    Composite,
    /// Terminal node. The only kind a machine may rest in.
    Leaf,
}

/// Entry, exit and init hooks.
pub type Action<D> = Box<dyn Fn(&mut D) + Send + Sync>;

/// Event handler body.
///
/// Receives the in-flight transition scope (domain data, ids of the current
/// leaf and the declaring state) and the concrete event.
pub type Handler<D, E> =
    Box<dyn for<'a> Fn(&mut Transit<'a, D, E>, &E) -> HandlerResult + Send + Sync>;

/// Immutable node of a state tree.
///
/// Built through [`crate::builder::StateBuilder`] and frozen inside a
/// [`crate::core::StateGraph`].
pub struct StateDescriptor<D, E> {
    pub(crate) id: StateId,
    pub(crate) name: String,
    pub(crate) parent: Option<StateId>,
    pub(crate) kind: StateKind,
    pub(crate) default_child: Option<StateId>,
    pub(crate) handlers: Vec<(EventId, Handler<D, E>)>,
    pub(crate) on_entry: Option<Action<D>>,
    pub(crate) on_exit: Option<Action<D>>,
    pub(crate) on_init: Option<Action<D>>,
    /// Ids from the root down to and including this state.
    pub(crate) path: Vec<StateId>,
}

impl<D, E> StateDescriptor<D, E> {
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Human readable name used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == StateKind::Leaf
    }

    pub fn is_composite(&self) -> bool {
        self.kind == StateKind::Composite
    }

    /// Child entered when this composite is the target of a transition.
    /// Always `None` for leaves.
    pub fn default_child(&self) -> Option<StateId> {
        self.default_child
    }

    /// Distance from the root. The root has depth 0.
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Ids from the root down to and including this state.
    pub fn path(&self) -> &[StateId] {
        &self.path
    }

    /// Check whether this node itself declares a handler for `event`.
    ///
    /// Ancestors are not consulted; see
    /// [`crate::core::StateGraph::accepts`] for the inherited check.
    pub fn declares(&self, event: EventId) -> bool {
        self.handlers.iter().any(|(id, _)| *id == event)
    }

    /// Event ids this node declares, in declaration order.
    pub fn events(&self) -> impl Iterator<Item = EventId> + '_ {
        self.handlers.iter().map(|(id, _)| *id)
    }

    pub(crate) fn handler(&self, event: EventId) -> Option<&Handler<D, E>> {
        self.handlers
            .iter()
            .find(|(id, _)| *id == event)
            .map(|(_, handler)| handler)
    }

    pub(crate) fn enter(&self, data: &mut D) {
        tracing::trace!(state = %self.name, "entry");
        if let Some(action) = &self.on_entry {
            action(data);
        }
    }

    pub(crate) fn exit(&self, data: &mut D) {
        tracing::trace!(state = %self.name, "exit");
        if let Some(action) = &self.on_exit {
            action(data);
        }
    }

    pub(crate) fn init(&self, data: &mut D) {
        tracing::trace!(state = %self.name, "init");
        if let Some(action) = &self.on_init {
            action(data);
        }
    }
}

impl<D, E> fmt::Debug for StateDescriptor<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("kind", &self.kind)
            .field("default_child", &self.default_child)
            .field("events", &self.events().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(counter: fn(&mut u32)) -> StateDescriptor<u32, EventId> {
        StateDescriptor {
            id: StateId(3),
            name: "S11".to_string(),
            parent: Some(StateId(2)),
            kind: StateKind::Leaf,
            default_child: None,
            handlers: vec![(
                6,
                Box::new(
                    |_: &mut Transit<'_, u32, EventId>, _: &EventId| -> HandlerResult { Ok(()) },
                ),
            )],
            on_entry: Some(Box::new(counter)),
            on_exit: None,
            on_init: None,
            path: vec![StateId(0), StateId(1), StateId(2), StateId(3)],
        }
    }

    #[test]
    fn declares_only_own_handlers() {
        let state = leaf(|n| *n += 1);
        assert!(state.declares(6));
        assert!(!state.declares(0));
        assert_eq!(state.events().collect::<Vec<_>>(), vec![6]);
    }

    #[test]
    fn depth_follows_path() {
        let state = leaf(|n| *n += 1);
        assert_eq!(state.depth(), 3);
        assert_eq!(state.path().first(), Some(&StateId(0)));
        assert!(state.is_leaf());
        assert!(!state.is_composite());
    }

    #[test]
    fn missing_hooks_are_no_ops() {
        let state = leaf(|n| *n += 10);
        let mut data = 0;
        state.exit(&mut data);
        state.init(&mut data);
        assert_eq!(data, 0);
        state.enter(&mut data);
        assert_eq!(data, 10);
    }

    #[test]
    fn state_id_displays_raw_value() {
        assert_eq!(StateId::new(12).to_string(), "#12");
        assert_eq!(StateId(4).index(), 4);
    }

    #[test]
    fn state_kind_serializes_by_name() {
        let json = serde_json::to_string(&StateKind::Composite).unwrap();
        assert_eq!(json, "\"Composite\"");
        let id: StateId = serde_json::from_str("5").unwrap();
        assert_eq!(id, StateId(5));
    }
}
