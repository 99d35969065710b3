//! Builder for a single state descriptor.

use crate::builder::error::BuildError;
use crate::core::{Action, EventId, Guard, Handler, StateDescriptor, StateId, StateKind};
use crate::machine::{HandlerResult, Transit};

/// Fluent declaration of one state: identity, place in the tree, hooks and
/// handlers.
pub struct StateBuilder<D, E> {
    id: StateId,
    name: String,
    kind: StateKind,
    parent: Option<StateId>,
    default_child: Option<StateId>,
    handlers: Vec<(EventId, Handler<D, E>)>,
    on_entry: Option<Action<D>>,
    on_exit: Option<Action<D>>,
    on_init: Option<Action<D>>,
}

impl<D: 'static, E: 'static> StateBuilder<D, E> {
    fn new(id: StateId, name: impl Into<String>, kind: StateKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            parent: None,
            default_child: None,
            handlers: Vec::new(),
            on_entry: None,
            on_exit: None,
            on_init: None,
        }
    }

    /// Declare an internal node. Requires [`Self::default_child`].
    pub fn composite(id: StateId, name: impl Into<String>) -> Self {
        Self::new(id, name, StateKind::Composite)
    }

    /// Declare a terminal node.
    pub fn leaf(id: StateId, name: impl Into<String>) -> Self {
        Self::new(id, name, StateKind::Leaf)
    }

    /// Set the parent. Omit for the root.
    pub fn parent(mut self, parent: StateId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Child entered by default when this composite is targeted.
    pub fn default_child(mut self, child: StateId) -> Self {
        self.default_child = Some(child);
        self
    }

    pub fn on_entry<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        self.on_entry = Some(Box::new(action));
        self
    }

    pub fn on_exit<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        self.on_exit = Some(Box::new(action));
        self
    }

    /// Hook run right before the default child is entered.
    pub fn on_init<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        self.on_init = Some(Box::new(action));
        self
    }

    /// Declare a handler for `event`.
    ///
    /// Inherited by every descendant that does not declare its own handler
    /// for the same event.
    pub fn on_event<F>(mut self, event: EventId, handler: F) -> Self
    where
        F: Fn(&mut Transit<'_, D, E>, &E) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.push((event, Box::new(handler)));
        self
    }

    /// Declare an unconditional transition to `target` on `event`.
    pub fn transition_on(self, event: EventId, target: StateId) -> Self {
        self.on_event(event, move |transit, _| transit.transition(target))
    }

    /// Declare a transition to `target` on `event` that only fires while
    /// `guard` holds. The event counts as handled either way.
    pub fn guarded_transition_on(self, event: EventId, guard: Guard<D>, target: StateId) -> Self {
        self.on_event(event, move |transit, _| {
            if guard.check(transit.data()) {
                transit.transition(target)
            } else {
                Ok(())
            }
        })
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    /// Validate the parts of the declaration that do not depend on other
    /// states.
    pub fn build(self) -> Result<StateDescriptor<D, E>, BuildError> {
        match (self.kind, self.default_child) {
            (StateKind::Composite, None) => return Err(BuildError::MissingDefaultChild(self.id)),
            (StateKind::Leaf, Some(_)) => return Err(BuildError::LeafWithDefaultChild(self.id)),
            _ => {}
        }

        for (i, (event, _)) in self.handlers.iter().enumerate() {
            if self.handlers[..i].iter().any(|(seen, _)| seen == event) {
                return Err(BuildError::DuplicateHandler {
                    state: self.id,
                    event: *event,
                });
            }
        }

        Ok(StateDescriptor {
            id: self.id,
            name: self.name,
            parent: self.parent,
            kind: self.kind,
            default_child: self.default_child,
            handlers: self.handlers,
            on_entry: self.on_entry,
            on_exit: self.on_exit,
            on_init: self.on_init,
            path: Vec::new(),
        })
    }
}
