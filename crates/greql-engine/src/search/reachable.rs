//! Collection of every vertex an automaton can end at.

use std::collections::VecDeque;

use greql_common::types::VertexId;
use greql_core::graph::GraphAccess;
use greql_core::marker::MarkerStore;
use indexmap::IndexSet;

use super::PathSearch;
use crate::error::Result;

impl<G: GraphAccess + ?Sized> PathSearch<'_, G> {
    /// Returns the vertices at the end of some accepted path from `start`,
    /// in discovery order.
    ///
    /// # Errors
    ///
    /// `UnknownVertex` if `start` is missing, plus budget and
    /// concurrent-mutation failures.
    pub fn reachable_vertices(&self, start: VertexId) -> Result<IndexSet<VertexId>> {
        self.reachable_vertices_from(&[start])
    }

    /// Returns the vertices at the end of some accepted path from any of
    /// `starts`. Every start is seeded at the initial state.
    ///
    /// # Errors
    ///
    /// As [`reachable_vertices`](Self::reachable_vertices), for each start.
    pub fn reachable_vertices_from(&self, starts: &[VertexId]) -> Result<IndexSet<VertexId>> {
        for &start in starts {
            self.require_vertex("start", start)?;
        }
        let guard = self.guard()?;

        let initial = self.automaton.initial_state();
        let mut markers = MarkerStore::new(self.automaton.state_count());
        let mut queue = VecDeque::new();
        for &start in starts {
            if markers.mark(start, initial) {
                queue.push_back((start, initial));
            }
        }

        let mut result = IndexSet::new();
        let mut steps = Vec::new();
        while let Some((vertex, state)) = queue.pop_front() {
            guard.check(self.graph, queue.len(), markers.len())?;

            if self.automaton.is_final(state) {
                result.insert(vertex);
            }

            self.expand(vertex, state, &mut steps);
            for step in &steps {
                if markers.mark(step.next_vertex, step.end_state) {
                    tracing::trace!(vertex = %step.next_vertex, state = %step.end_state, "discovered");
                    queue.push_back((step.next_vertex, step.end_state));
                }
            }
        }

        tracing::debug!(
            starts = starts.len(),
            markers = markers.len(),
            reachable = result.len(),
            "reachable set collected"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greql_core::automaton::{Automaton, AutomatonBuilder, TransitionKind, TypeFilter};
    use greql_core::graph::Direction;
    use greql_core::graph::lpg::LpgStore;

    /// `-->{KNOWS}+`
    fn knows_plus() -> Automaton {
        let mut builder = AutomatonBuilder::new();
        let s0 = builder.add_state(false);
        let s1 = builder.add_state(true);
        let knows = || TransitionKind::Edge {
            direction: Direction::Outgoing,
            edge_types: TypeFilter::names(["KNOWS"]),
        };
        builder.add_transition(s0, s1, knows()).add_transition(s1, s1, knows());
        builder.build().unwrap()
    }

    #[test]
    fn test_cycle_terminates() {
        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();
        let b = store.create_vertex(&[]).unwrap();
        let c = store.create_vertex(&[]).unwrap();
        let d = store.create_vertex(&[]).unwrap();
        store.create_edge(a, b, "KNOWS").unwrap();
        store.create_edge(b, c, "KNOWS").unwrap();
        store.create_edge(c, a, "KNOWS").unwrap();
        store.create_edge(c, d, "LIKES").unwrap();

        let automaton = knows_plus();
        let search = PathSearch::new(&store, &automaton);
        let reached: Vec<_> = search.reachable_vertices(a).unwrap().into_iter().collect();
        assert_eq!(reached, vec![b, c, a]);
    }

    #[test]
    fn test_multiple_starts() {
        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();
        let b = store.create_vertex(&[]).unwrap();
        let x = store.create_vertex(&[]).unwrap();
        let y = store.create_vertex(&[]).unwrap();
        store.create_edge(a, x, "KNOWS").unwrap();
        store.create_edge(b, y, "KNOWS").unwrap();

        let automaton = knows_plus();
        let search = PathSearch::new(&store, &automaton);
        let reached = search.reachable_vertices_from(&[a, b, a]).unwrap();
        assert_eq!(reached.into_iter().collect::<Vec<_>>(), vec![x, y]);
        assert!(search.reachable_vertices_from(&[]).unwrap().is_empty());
    }
}
