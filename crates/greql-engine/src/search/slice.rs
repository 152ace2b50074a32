//! Slice construction.

use std::collections::VecDeque;

use greql_common::types::VertexId;
use greql_core::graph::GraphAccess;
use greql_core::marker::{MarkerEntry, MarkerList, MarkerStore};
use indexmap::IndexSet;

use super::PathSearch;
use crate::error::{EvaluationError, Result};
use crate::result::Slice;

impl<G: GraphAccess + ?Sized> PathSearch<'_, G> {
    /// Builds the slice of every accepted path starting at one of `roots`.
    ///
    /// Each `(vertex, state)` pair is expanded once, but every distinct
    /// `(parent vertex, parent state, edge)` link reaching it is recorded.
    ///
    /// # Errors
    ///
    /// `EmptyCriterion` for an empty root set, `UnknownVertex` if a root is
    /// missing, plus budget and concurrent-mutation failures.
    pub fn slice(&self, roots: &[VertexId]) -> Result<Slice> {
        if roots.is_empty() {
            return Err(EvaluationError::EmptyCriterion);
        }
        for &root in roots {
            self.require_vertex("root", root)?;
        }
        let guard = self.guard()?;

        let criterion: IndexSet<VertexId> = roots.iter().copied().collect();
        let initial = self.automaton.initial_state();
        let mut markers: MarkerStore<MarkerList> = MarkerStore::new(self.automaton.state_count());
        let mut queue = VecDeque::new();
        for &root in &criterion {
            let entry = MarkerEntry::root(root, initial);
            markers.mark_entry(entry);
            queue.push_back(entry);
        }

        let mut finals = Vec::new();
        let mut links = 0usize;
        let mut steps = Vec::new();
        while let Some(entry) = queue.pop_front() {
            guard.check(self.graph, queue.len(), markers.len())?;

            if self.automaton.is_final(entry.state) {
                finals.push(entry.key());
            }

            self.expand(entry.vertex, entry.state, &mut steps);
            for step in &steps {
                let child = MarkerEntry::child(step.next_vertex, step.end_state, &entry, step.edge);
                let seen = markers.is_marked(child.vertex, child.state);
                if !markers.mark_entry(child) {
                    continue;
                }
                links += 1;
                if !seen {
                    tracing::trace!(
                        vertex = %child.vertex,
                        state = %child.state,
                        distance = child.distance,
                        "discovered"
                    );
                    queue.push_back(child);
                }
            }
        }

        let slice = Slice::from_markers(criterion, self.automaton, &markers, &finals);
        tracing::debug!(
            roots = slice.slicing_criterion().len(),
            markers = markers.len(),
            links,
            vertices = slice.vertex_count(),
            "slice built"
        );
        Ok(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greql_core::automaton::{Automaton, AutomatonBuilder, TransitionKind, TypeFilter};
    use greql_core::graph::Direction;
    use greql_core::graph::lpg::LpgStore;

    /// `-->+`
    fn out_plus() -> Automaton {
        let mut builder = AutomatonBuilder::new();
        let s0 = builder.add_state(false);
        let s1 = builder.add_state(true);
        let out = || TransitionKind::Edge {
            direction: Direction::Outgoing,
            edge_types: TypeFilter::Any,
        };
        builder.add_transition(s0, s1, out()).add_transition(s1, s1, out());
        builder.build().unwrap()
    }

    #[test]
    fn test_shared_descendant_keeps_both_parents() {
        let store = LpgStore::new();
        let r1 = store.create_vertex(&[]).unwrap();
        let r2 = store.create_vertex(&[]).unwrap();
        let x = store.create_vertex(&[]).unwrap();
        let e1 = store.create_edge(r1, x, "E").unwrap();
        let e2 = store.create_edge(r2, x, "E").unwrap();

        let automaton = out_plus();
        let slice = PathSearch::new(&store, &automaton).slice(&[r1, r2]).unwrap();

        let node = slice.nodes(x).next().unwrap();
        assert_eq!(node.parents.len(), 2);
        assert_eq!(node.parents[0].vertex, r1);
        assert_eq!(node.parents[0].edge, Some(e1));
        assert_eq!(node.parents[1].vertex, r2);
        assert_eq!(node.parents[1].edge, Some(e2));
        assert_eq!(node.discovery_parent.map(|p| p.vertex), Some(r1));

        assert_eq!(slice.vertex_count(), 3);
        assert_eq!(slice.edge_count(), 2);
        assert_eq!(slice.leaves().collect::<Vec<_>>(), vec![x]);
        assert_eq!(slice.degree(x), 2);
        assert_eq!(slice.distance(x), Some(1));
        assert_eq!(
            slice.parents(x).into_iter().collect::<Vec<_>>(),
            vec![(r1, e1), (r2, e2)]
        );
        assert_eq!(slice.children(r2).into_iter().collect::<Vec<_>>(), vec![x]);
        assert_eq!(slice.extract_paths(x).len(), 2);
    }

    #[test]
    fn test_parallel_edges_are_kept_apart() {
        let store = LpgStore::new();
        let r = store.create_vertex(&[]).unwrap();
        let x = store.create_vertex(&[]).unwrap();
        let e1 = store.create_edge(r, x, "E").unwrap();
        let e2 = store.create_edge(r, x, "E").unwrap();

        let automaton = out_plus();
        let slice = PathSearch::new(&store, &automaton).slice(&[r]).unwrap();

        assert!(slice.contains_edge(e1) && slice.contains_edge(e2));
        assert_eq!(slice.nodes(x).next().unwrap().parents.len(), 2);
        assert_eq!(slice.extract_paths(x).len(), 2);
    }

    #[test]
    fn test_cycle_through_root() {
        let store = LpgStore::new();
        let r = store.create_vertex(&[]).unwrap();
        let a = store.create_vertex(&[]).unwrap();
        let ra = store.create_edge(r, a, "E").unwrap();
        let ar = store.create_edge(a, r, "E").unwrap();

        let automaton = out_plus();
        let slice = PathSearch::new(&store, &automaton).slice(&[r]).unwrap();

        // r is a root under s0 and reached again under s1.
        assert_eq!(slice.nodes(r).count(), 2);
        assert!(slice.node(r, automaton.initial_state()).unwrap().is_root);
        assert_eq!(slice.distance(r), Some(0));
        assert!(slice.contains_edge(ra) && slice.contains_edge(ar));

        // Only the accepted round trip; the root node alone is not final.
        let search = PathSearch::new(&store, &automaton);
        let paths = slice.extract_paths(r);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].edge_trace(), [ra, ar]);
        assert!(paths.iter().all(|p| search.matches(p).unwrap()));
    }

    #[test]
    fn test_extract_paths_skips_non_final_vertex() {
        let store = LpgStore::new();
        let r = store.create_vertex(&[]).unwrap();
        let x = store.create_vertex(&[]).unwrap();
        store.create_edge(r, x, "E").unwrap();

        let automaton = out_plus();
        let slice = PathSearch::new(&store, &automaton).slice(&[r]).unwrap();

        assert!(slice.contains_vertex(r) && !slice.is_leaf(r));
        assert!(slice.extract_paths(r).is_empty());
        assert_eq!(slice.extract_paths(x).len(), 1);
    }

    #[test]
    fn test_empty_criterion() {
        let store = LpgStore::new();
        let automaton = out_plus();
        assert_eq!(
            PathSearch::new(&store, &automaton).slice(&[]).unwrap_err(),
            EvaluationError::EmptyCriterion
        );
    }
}
