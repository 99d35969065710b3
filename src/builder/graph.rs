//! Builder and validator for whole state graphs.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::core::{StateDescriptor, StateGraph, StateId};

/// Collects state declarations and freezes them into a [`StateGraph`].
///
/// All topology checks happen in [`Self::build`]; a graph that builds can
/// always be started and never fails a dispatch because of its shape.
pub struct StateGraphBuilder<D, E> {
    states: Vec<StateBuilder<D, E>>,
}

impl<D, E> StateGraphBuilder<D, E> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }
}

impl<D: 'static, E: 'static> StateGraphBuilder<D, E> {
    /// Add one state declaration.
    pub fn state(mut self, state: StateBuilder<D, E>) -> Self {
        self.states.push(state);
        self
    }

    /// Add several state declarations at once.
    pub fn states(mut self, states: impl IntoIterator<Item = StateBuilder<D, E>>) -> Self {
        self.states.extend(states);
        self
    }

    /// Validate the topology and freeze the graph.
    ///
    /// Rejects id collisions, dangling parents, missing or extra roots,
    /// parent cycles, leaves with children and default children that are
    /// not direct children.
    pub fn build(self) -> Result<StateGraph<D, E>, BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::EmptyGraph);
        }

        let slots = self
            .states
            .iter()
            .map(|state| state.id().index() + 1)
            .max()
            .unwrap_or(0);
        let mut registry: Vec<Option<StateDescriptor<D, E>>> = Vec::with_capacity(slots);
        registry.resize_with(slots, || None);

        let len = self.states.len();
        for state in self.states {
            let descriptor = state.build()?;
            let slot = &mut registry[descriptor.id.index()];
            if slot.is_some() {
                return Err(BuildError::DuplicateState(descriptor.id));
            }
            *slot = Some(descriptor);
        }

        let root = find_root(&registry)?;
        link_parents(&registry)?;
        fill_paths(&mut registry)?;
        check_default_children(&registry)?;

        Ok(StateGraph {
            states: registry,
            root,
            len,
        })
    }
}

impl<D, E> Default for StateGraphBuilder<D, E> {
    fn default() -> Self {
        Self::new()
    }
}

fn find_root<D, E>(registry: &[Option<StateDescriptor<D, E>>]) -> Result<StateId, BuildError> {
    let mut roots = registry
        .iter()
        .flatten()
        .filter(|state| state.parent.is_none());
    let root = roots.next().ok_or(BuildError::MissingRoot)?;
    if let Some(second) = roots.next() {
        return Err(BuildError::MultipleRoots {
            first: root.id,
            second: second.id,
        });
    }
    if !root.is_composite() {
        return Err(BuildError::RootNotComposite(root.id));
    }
    Ok(root.id)
}

fn link_parents<D, E>(registry: &[Option<StateDescriptor<D, E>>]) -> Result<(), BuildError> {
    for state in registry.iter().flatten() {
        let Some(parent_id) = state.parent else {
            continue;
        };
        let parent = registry
            .get(parent_id.index())
            .and_then(Option::as_ref)
            .ok_or(BuildError::UnknownParent {
                state: state.id,
                parent: parent_id,
            })?;
        if parent.is_leaf() {
            return Err(BuildError::LeafWithChildren {
                leaf: parent_id,
                child: state.id,
            });
        }
    }
    Ok(())
}

/// Store the root-to-self path on every descriptor. A walk longer than the
/// number of states can only mean a cycle.
fn fill_paths<D, E>(registry: &mut [Option<StateDescriptor<D, E>>]) -> Result<(), BuildError> {
    let limit = registry.iter().flatten().count();
    for index in 0..registry.len() {
        let Some(state) = &registry[index] else {
            continue;
        };

        let mut path = vec![state.id];
        let mut cursor = state.parent;
        while let Some(parent) = cursor {
            if path.len() > limit {
                return Err(BuildError::ParentCycle(state.id));
            }
            path.push(parent);
            cursor = registry
                .get(parent.index())
                .and_then(Option::as_ref)
                .and_then(|node| node.parent);
        }
        path.reverse();

        if let Some(state) = &mut registry[index] {
            state.path = path;
        }
    }
    Ok(())
}

fn check_default_children<D, E>(
    registry: &[Option<StateDescriptor<D, E>>],
) -> Result<(), BuildError> {
    for state in registry.iter().flatten() {
        let Some(child_id) = state.default_child else {
            continue;
        };
        let is_direct_child = registry
            .get(child_id.index())
            .and_then(Option::as_ref)
            .is_some_and(|child| child.parent == Some(state.id));
        if !is_direct_child {
            return Err(BuildError::InvalidDefaultChild {
                state: state.id,
                child: child_id,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventId;

    type Builder = StateGraphBuilder<(), EventId>;
    type State = StateBuilder<(), EventId>;

    fn id(raw: u16) -> StateId {
        StateId(raw)
    }

    fn top() -> State {
        State::composite(id(0), "Top").default_child(id(1))
    }

    #[test]
    fn empty_graph_is_rejected() {
        assert_eq!(Builder::new().build().unwrap_err(), BuildError::EmptyGraph);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Builder::new()
            .state(top())
            .state(State::leaf(id(1), "A").parent(id(0)))
            .state(State::leaf(id(1), "B").parent(id(0)))
            .build();

        assert_eq!(result.unwrap_err(), BuildError::DuplicateState(id(1)));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let result = Builder::new()
            .state(top())
            .state(State::leaf(id(1), "A").parent(id(0)))
            .state(State::leaf(id(2), "B").parent(id(9)))
            .build();

        assert_eq!(
            result.unwrap_err(),
            BuildError::UnknownParent {
                state: id(2),
                parent: id(9)
            }
        );
    }

    #[test]
    fn exactly_one_root_is_required() {
        let two_roots = Builder::new()
            .state(top())
            .state(State::leaf(id(1), "A").parent(id(0)))
            .state(State::composite(id(2), "Other").default_child(id(3)))
            .state(State::leaf(id(3), "B").parent(id(2)))
            .build();
        assert_eq!(
            two_roots.unwrap_err(),
            BuildError::MultipleRoots {
                first: id(0),
                second: id(2)
            }
        );

        let no_root = Builder::new()
            .state(State::composite(id(0), "A").parent(id(1)).default_child(id(1)))
            .state(State::composite(id(1), "B").parent(id(0)).default_child(id(0)))
            .build();
        assert_eq!(no_root.unwrap_err(), BuildError::MissingRoot);
    }

    #[test]
    fn root_must_be_composite() {
        let result = Builder::new().state(State::leaf(id(0), "Top")).build();

        assert_eq!(result.unwrap_err(), BuildError::RootNotComposite(id(0)));
    }

    #[test]
    fn parent_cycle_is_rejected() {
        let result = Builder::new()
            .state(top())
            .state(State::leaf(id(1), "A").parent(id(0)))
            .state(State::composite(id(2), "B").parent(id(3)).default_child(id(3)))
            .state(State::composite(id(3), "C").parent(id(2)).default_child(id(2)))
            .build();

        assert!(matches!(result, Err(BuildError::ParentCycle(_))));
    }

    #[test]
    fn leaf_cannot_have_children() {
        let result = Builder::new()
            .state(top())
            .state(State::leaf(id(1), "A").parent(id(0)))
            .state(State::leaf(id(2), "B").parent(id(1)))
            .build();

        assert_eq!(
            result.unwrap_err(),
            BuildError::LeafWithChildren {
                leaf: id(1),
                child: id(2)
            }
        );
    }

    #[test]
    fn default_child_must_be_direct_child() {
        let result = Builder::new()
            .state(State::composite(id(0), "Top").default_child(id(2)))
            .state(State::composite(id(1), "A").parent(id(0)).default_child(id(2)))
            .state(State::leaf(id(2), "B").parent(id(1)))
            .build();

        assert_eq!(
            result.unwrap_err(),
            BuildError::InvalidDefaultChild {
                state: id(0),
                child: id(2)
            }
        );
    }

    #[test]
    fn sparse_ids_build_with_paths() {
        let graph = Builder::new()
            .states([
                State::composite(id(10), "Top").default_child(id(20)),
                State::composite(id(20), "Mid").parent(id(10)).default_child(id(30)),
                State::leaf(id(30), "Leaf").parent(id(20)),
            ])
            .build()
            .unwrap();

        assert_eq!(graph.root(), id(10));
        assert_eq!(graph.len(), 3);
        assert!(!graph.contains(id(0)));
        assert_eq!(graph.state(id(30)).unwrap().path(), &[id(10), id(20), id(30)]);
        assert_eq!(graph.default_leaf(id(10)), Some(id(30)));
    }
}
