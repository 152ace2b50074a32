//! Reachability test between two vertices.

use std::collections::VecDeque;

use greql_common::types::VertexId;
use greql_core::graph::GraphAccess;
use greql_core::marker::MarkerStore;

use super::PathSearch;
use crate::error::Result;

impl<G: GraphAccess + ?Sized> PathSearch<'_, G> {
    /// Returns `true` if some path from `start` to `target` is accepted.
    ///
    /// Stops at the first `(target, final state)` pair dequeued. The empty
    /// path counts: `start == target` with a final initial state is `true`.
    ///
    /// # Errors
    ///
    /// `UnknownVertex` if either vertex is missing, plus budget and
    /// concurrent-mutation failures.
    pub fn is_reachable(&self, start: VertexId, target: VertexId) -> Result<bool> {
        self.require_vertex("start", start)?;
        self.require_vertex("target", target)?;
        let guard = self.guard()?;

        let initial = self.automaton.initial_state();
        let mut markers = MarkerStore::new(self.automaton.state_count());
        let mut queue = VecDeque::new();
        markers.mark(start, initial);
        queue.push_back((start, initial));

        let mut steps = Vec::new();
        while let Some((vertex, state)) = queue.pop_front() {
            guard.check(self.graph, queue.len(), markers.len())?;

            if vertex == target && self.automaton.is_final(state) {
                tracing::debug!(%start, %target, markers = markers.len(), "target reached");
                return Ok(true);
            }

            self.expand(vertex, state, &mut steps);
            for step in &steps {
                if markers.mark(step.next_vertex, step.end_state) {
                    tracing::trace!(vertex = %step.next_vertex, state = %step.end_state, "discovered");
                    queue.push_back((step.next_vertex, step.end_state));
                }
            }
        }

        tracing::debug!(%start, %target, markers = markers.len(), "target not reachable");
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greql_core::automaton::{Automaton, AutomatonBuilder, TransitionKind, TypeFilter};
    use greql_core::graph::Direction;
    use greql_core::graph::lpg::LpgStore;
    use greql_core::graph::subgraph::Subgraph;

    fn one_edge(direction: Direction) -> Automaton {
        let mut builder = AutomatonBuilder::new();
        let s0 = builder.add_state(false);
        let s1 = builder.add_state(true);
        builder.add_transition(s0, s1, TransitionKind::Edge {
            direction,
            edge_types: TypeFilter::Any,
        });
        builder.build().unwrap()
    }

    #[test]
    fn test_single_edge() {
        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();
        let b = store.create_vertex(&[]).unwrap();
        store.create_edge(a, b, "E").unwrap();

        let out = one_edge(Direction::Outgoing);
        let search = PathSearch::new(&store, &out);
        assert!(search.is_reachable(a, b).unwrap());
        assert!(!search.is_reachable(b, a).unwrap());
        // The empty path is not accepted by a non-final initial state.
        assert!(!search.is_reachable(a, a).unwrap());

        let both = one_edge(Direction::Both);
        assert!(PathSearch::new(&store, &both).is_reachable(b, a).unwrap());
    }

    #[test]
    fn test_empty_path() {
        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();

        let mut builder = AutomatonBuilder::new();
        builder.add_state(true);
        let automaton = builder.build().unwrap();

        assert!(PathSearch::new(&store, &automaton).is_reachable(a, a).unwrap());
    }

    #[test]
    fn test_subgraph_blocks_vertex() {
        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();
        let b = store.create_vertex(&[]).unwrap();
        let e = store.create_edge(a, b, "E").unwrap();

        let automaton = one_edge(Direction::Outgoing);
        let without_b = Subgraph::from_parts([a], [e]);
        let search = PathSearch::new(&store, &automaton).with_subgraph(&without_b);
        assert!(!search.is_reachable(a, b).unwrap());
    }
}
