//! Finite automata driving regular path search.
//!
//! An [`Automaton`] is compiled from a regular path description elsewhere
//! (or assembled with [`AutomatonBuilder`]). Searches walk the graph and the
//! automaton in lockstep: at each `(vertex, state)` pair,
//! [`Automaton::expand_into`] lists the [`Step`]s the traversal may take.
//!
//! - [`state`] - `StateId` and `State`
//! - [`transition`] - `Transition`, `TransitionKind`, `TypeFilter`
//! - [`builder`] - `AutomatonBuilder`

mod builder;
mod error;
pub mod state;
pub mod transition;

pub use builder::AutomatonBuilder;
pub use error::AutomatonError;
pub use state::{State, StateId};
pub use transition::{Transition, TransitionKind, TypeFilter};

use crate::graph::subgraph::SubgraphFilter;
use crate::graph::{GraphAccess, Incidence};
use greql_common::types::{EdgeId, VertexId};

/// One move available to a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    /// Vertex after the move.
    pub next_vertex: VertexId,
    /// State after the move.
    pub end_state: StateId,
    /// Edge crossed, `None` for free transitions.
    pub edge: Option<EdgeId>,
    /// Whether an edge was crossed.
    pub consumes_edge: bool,
}

/// A validated automaton: dense states `0..N` plus an initial state.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<State>,
    initial: StateId,
}

impl Automaton {
    /// Validates and creates an automaton.
    ///
    /// # Errors
    ///
    /// Rejects an empty state list, an initial state out of range, a state
    /// whose id differs from its position and transitions to missing states.
    pub fn new(states: Vec<State>, initial: StateId) -> Result<Self, AutomatonError> {
        if states.is_empty() {
            return Err(AutomatonError::Empty);
        }
        if initial.index() >= states.len() {
            return Err(AutomatonError::InitialStateOutOfRange {
                initial,
                count: states.len(),
            });
        }
        for (position, state) in states.iter().enumerate() {
            if state.id().index() != position {
                return Err(AutomatonError::NonDenseStateId {
                    position,
                    id: state.id(),
                });
            }
            if let Some(t) = state
                .transitions()
                .iter()
                .find(|t| t.end_state.index() >= states.len())
            {
                return Err(AutomatonError::DanglingTransition {
                    from: state.id(),
                    to: t.end_state,
                });
            }
        }
        Ok(Self { states, initial })
    }

    /// Returns the initial state.
    #[inline]
    #[must_use]
    pub fn initial_state(&self) -> StateId {
        self.initial
    }

    /// Returns the number of states.
    #[inline]
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Returns all states, indexed by id.
    #[must_use]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Returns a state.
    #[inline]
    #[must_use]
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index())
    }

    /// Returns `true` if `id` is a final state.
    #[inline]
    #[must_use]
    pub fn is_final(&self, id: StateId) -> bool {
        self.state(id).is_some_and(State::is_final)
    }

    /// Iterates over the final states.
    pub fn final_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().filter(|s| s.is_final()).map(State::id)
    }

    /// Returns `true` if expanding `state` needs the vertex's incidences.
    #[inline]
    #[must_use]
    pub fn needs_incidences(&self, state: StateId) -> bool {
        self.state(state)
            .is_some_and(State::has_consuming_transitions)
    }

    /// Pushes every step available at `(vertex, state)` onto `out`.
    ///
    /// Free transitions come first, in list order. Then each consuming
    /// transition is tried against every incidence in the order given.
    pub fn expand_into<G: GraphAccess + ?Sized>(
        &self,
        graph: &G,
        vertex: VertexId,
        state: StateId,
        incidences: &[Incidence],
        filter: Option<&dyn SubgraphFilter>,
        out: &mut Vec<Step>,
    ) {
        let Some(state) = self.state(state) else {
            return;
        };

        for t in state.transitions().iter().filter(|t| !t.consumes_edge()) {
            if t.accepts(graph, vertex, None, filter) {
                out.push(Step {
                    next_vertex: vertex,
                    end_state: t.end_state,
                    edge: None,
                    consumes_edge: false,
                });
            }
        }

        if !state.has_consuming_transitions() {
            return;
        }
        for t in state.transitions().iter().filter(|t| t.consumes_edge()) {
            for inc in incidences {
                if t.accepts(graph, vertex, Some(inc), filter) {
                    out.push(Step {
                        next_vertex: t.next_vertex(vertex, Some(inc)),
                        end_state: t.end_state,
                        edge: Some(inc.edge),
                        consumes_edge: true,
                    });
                }
            }
        }
    }
}
