//! Transition planning and execution.
//!
//! A transition is described by three states: the leaf that was current
//! when the event arrived, the state whose handler declared the transition
//! (the source) and the target. Planning walks the precomputed root paths
//! of the current leaf and of the target to find which states to exit and
//! which to enter. The result borrows slices of those paths and allocates
//! nothing.
//!
//! With `within(x, y)` meaning "x is y or a descendant of y", and the
//! parent of the root standing for a super-root everything is within:
//!
//! - exit `level`, then stop when
//!   `within(parent(target), parent(level)) && within(source, level)`
//! - enter `level` (starting from the target), and stop climbing when
//!   `within(source, level) || (within(source, parent(level)) && !within(level, source))`
//!
//! Entries replay outermost first, then the target's init cascade settles
//! on a leaf.

use crate::core::{EventId, StateGraph, StateId};
use crate::machine::error::{HandlerResult, MachineError};
use serde::{Deserialize, Serialize};

/// One action of a transition, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Exit(StateId),
    Enter(StateId),
    Init(StateId),
}

/// Ordered exit and entry lists of a transition, computed without running
/// anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionPlan<'g> {
    current: StateId,
    source: StateId,
    target: StateId,
    boundary: Option<StateId>,
    /// Root-to-leaf slice of the current leaf's path; exited in reverse.
    exit: &'g [StateId],
    /// Root-to-leaf slice of the target's path.
    entry: &'g [StateId],
    /// Target followed by its default-child chain down to a leaf.
    cascade: &'g [StateId],
}

impl<'g> TransitionPlan<'g> {
    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn source(&self) -> StateId {
        self.source
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    /// Deepest state that is neither exited nor entered. `None` when the
    /// transition exits the root itself.
    pub fn boundary(&self) -> Option<StateId> {
        self.boundary
    }

    /// States to exit, leaf first.
    pub fn exits(&self) -> impl Iterator<Item = StateId> + 'g {
        let exit = self.exit;
        exit.iter().rev().copied()
    }

    /// States to enter before the init cascade, outermost first.
    pub fn entries(&self) -> impl Iterator<Item = StateId> + 'g {
        let entry = self.entry;
        entry.iter().copied()
    }

    /// Leaf the machine will rest in once the transition completes.
    pub fn leaf(&self) -> StateId {
        self.cascade.last().copied().unwrap_or(self.target)
    }

    /// Every action of the transition in order: exits, entries, then an
    /// init/entry pair per composite of the target's default chain.
    pub fn steps(&self) -> impl Iterator<Item = Step> + 'g {
        let exits = self.exits().map(Step::Exit);
        let entries = self.entries().map(Step::Enter);
        let chain = self.cascade;
        let cascade = chain
            .windows(2)
            .flat_map(|pair| [Step::Init(pair[0]), Step::Enter(pair[1])]);
        exits.chain(entries).chain(cascade)
    }
}

impl<D, E> StateGraph<D, E> {
    /// Compute the exit and entry sequence for a transition to `target`
    /// declared by `source` while `current` is the active leaf.
    ///
    /// `source` must be `current` or one of its ancestors.
    pub fn plan_transition(
        &self,
        current: StateId,
        source: StateId,
        target: StateId,
    ) -> Result<TransitionPlan<'_>, MachineError> {
        let current_node = self
            .state(current)
            .ok_or(MachineError::UnknownState(current))?;
        if !current_node.is_leaf() {
            return Err(MachineError::NotALeaf(current));
        }
        if !self.contains(source) {
            return Err(MachineError::UnknownState(source));
        }
        if !self.is_within(current, source) {
            return Err(MachineError::SourceNotAncestor {
                declared: source,
                current,
            });
        }
        let target_node = self
            .state(target)
            .ok_or(MachineError::UnknownState(target))?;
        let cascade = self
            .cascade(target)
            .ok_or(MachineError::UnknownState(target))?;

        let target_parent = target_node.parent();
        let exit_path = current_node.path();
        let mut depth = current_node.depth();
        loop {
            let level = exit_path[depth];
            let parent = depth.checked_sub(1).map(|up| exit_path[up]);
            let stop =
                self.is_within_opt(target_parent, parent) && self.is_within(source, level);
            match depth.checked_sub(1) {
                Some(up) if !stop => depth = up,
                _ => break,
            }
        }
        let boundary = depth.checked_sub(1).map(|up| exit_path[up]);
        let exit = &exit_path[depth..];

        let entry_path = target_node.path();
        let mut depth = target_node.depth();
        loop {
            let level = entry_path[depth];
            let parent = depth.checked_sub(1).map(|up| entry_path[up]);
            let stop = self.is_within(source, level)
                || (self.is_within_opt(Some(source), parent) && !self.is_within(level, source));
            match depth.checked_sub(1) {
                Some(up) if !stop => depth = up,
                _ => break,
            }
        }
        let entry = &entry_path[depth..];

        Ok(TransitionPlan {
            current,
            source,
            target,
            boundary,
            exit,
            entry,
            cascade,
        })
    }
}

/// Scope handed to an event handler.
///
/// Gives access to the machine's domain data and lets the handler trigger
/// at most one transition. A handler that returns without calling
/// [`Self::transition`] leaves the current state untouched.
pub struct Transit<'a, D, E> {
    graph: &'a StateGraph<D, E>,
    data: &'a mut D,
    current: StateId,
    source: StateId,
    event: EventId,
    landed: Option<StateId>,
}

impl<'a, D, E> Transit<'a, D, E> {
    pub(crate) fn new(
        graph: &'a StateGraph<D, E>,
        data: &'a mut D,
        current: StateId,
        source: StateId,
        event: EventId,
    ) -> Self {
        Self {
            graph,
            data,
            current,
            source,
            event,
            landed: None,
        }
    }

    pub fn data(&self) -> &D {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut *self.data
    }

    /// Leaf that was current when the event arrived.
    pub fn current(&self) -> StateId {
        self.current
    }

    /// State whose handler is running. Differs from [`Self::current`] when
    /// the handler is inherited from an ancestor.
    pub fn source(&self) -> StateId {
        self.source
    }

    pub fn event_id(&self) -> EventId {
        self.event
    }

    pub fn graph(&self) -> &'a StateGraph<D, E> {
        self.graph
    }

    /// Leaf reached by a transition taken in this scope, if any.
    pub fn landed(&self) -> Option<StateId> {
        self.landed
    }

    /// Plan a transition from this scope without running it.
    pub fn plan(&self, target: StateId) -> Result<TransitionPlan<'a>, MachineError> {
        self.graph.plan_transition(self.current, self.source, target)
    }

    /// Transition to `target`: exits, then entries, then the init cascade.
    pub fn transition(&mut self, target: StateId) -> HandlerResult {
        self.transition_with(target, |_| {})
    }

    /// Transition to `target`, running `action` between the exit and the
    /// entry phase.
    ///
    /// Fails without running anything if `target` is unknown or a
    /// transition was already taken in this scope.
    pub fn transition_with<F>(&mut self, target: StateId, action: F) -> HandlerResult
    where
        F: FnOnce(&mut D),
    {
        if let Some(landed) = self.landed {
            return Err(MachineError::TransitionAlreadyTaken {
                declared: self.source,
                landed,
            });
        }
        let plan = self.plan(target)?;

        for id in plan.exits() {
            if let Some(state) = self.graph.state(id) {
                state.exit(&mut *self.data);
            }
        }
        action(&mut *self.data);
        for id in plan.entries() {
            if let Some(state) = self.graph.state(id) {
                state.enter(&mut *self.data);
            }
        }
        let leaf = self
            .graph
            .settle(target, &mut *self.data)
            .ok_or(MachineError::UnknownState(target))?;

        tracing::debug!(
            from = %self.graph.name(self.current),
            source = %self.graph.name(self.source),
            target = %self.graph.name(target),
            leaf = %self.graph.name(leaf),
            "transition complete"
        );
        self.landed = Some(leaf);
        Ok(())
    }
}
