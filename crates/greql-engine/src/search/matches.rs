//! Verification of a known path against the automaton.

use greql_common::types::VertexId;
use greql_core::automaton::StateId;
use greql_core::graph::GraphAccess;
use smallvec::SmallVec;

use super::PathSearch;
use crate::error::{EvaluationError, Result};
use crate::result::Path;

type StateSet = SmallVec<[StateId; 8]>;

impl<G: GraphAccess + ?Sized> PathSearch<'_, G> {
    /// Returns `true` if the automaton accepts `path`.
    ///
    /// Only the path's own edges are looked at. The walk tracks every state
    /// the automaton can be in at the current vertex, closed under free
    /// transitions. Every (position, state) pair counts as a marker against
    /// the budget.
    ///
    /// # Errors
    ///
    /// `InvalidPath` if the path is not a walk in the graph.
    pub fn matches(&self, path: &Path) -> Result<bool> {
        self.validate_path(path)?;
        let guard = self.guard()?;

        let mut vertex = path.start_vertex();
        let mut active = self.closure(vertex, [self.automaton.initial_state()]);
        let mut steps = Vec::new();
        let mut visited = active.len();

        for (position, (edge, next)) in path.steps().enumerate() {
            guard.check(self.graph, 0, visited)?;

            let incidences = self.graph.incidences_of_edge(vertex, edge);
            let mut moved = StateSet::new();
            for &state in &active {
                steps.clear();
                self.automaton
                    .expand_into(self.graph, vertex, state, &incidences, self.subgraph, &mut steps);
                for step in &steps {
                    if step.consumes_edge && step.next_vertex == next && !moved.contains(&step.end_state) {
                        moved.push(step.end_state);
                    }
                }
            }

            if moved.is_empty() {
                tracing::debug!(position, %edge, "path rejected");
                return Ok(false);
            }
            active = self.closure(next, moved);
            visited += active.len();
            vertex = next;
        }

        let accepted = active.iter().any(|&s| self.automaton.is_final(s));
        tracing::debug!(length = path.length(), accepted, "path verified");
        Ok(accepted)
    }

    /// Extends `states` with everything reachable over free transitions at
    /// `vertex`.
    fn closure(&self, vertex: VertexId, states: impl IntoIterator<Item = StateId>) -> StateSet {
        let mut set: StateSet = states.into_iter().collect();
        let mut steps = Vec::new();
        let mut i = 0;
        while i < set.len() {
            steps.clear();
            self.automaton
                .expand_into(self.graph, vertex, set[i], &[], self.subgraph, &mut steps);
            for step in &steps {
                if !set.contains(&step.end_state) {
                    set.push(step.end_state);
                }
            }
            i += 1;
        }
        set
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        let start = path.start_vertex();
        if !self.graph.contains_vertex(start) {
            return Err(EvaluationError::InvalidPath(format!("start vertex {start} is not in the graph")));
        }

        let mut vertex = start;
        for (edge, next) in path.steps() {
            if !self.graph.contains_edge(edge) {
                return Err(EvaluationError::InvalidPath(format!("edge {edge} is not in the graph")));
            }
            let connects = self
                .graph
                .incidences_of_edge(vertex, edge)
                .iter()
                .any(|inc| inc.other == next);
            if !connects {
                return Err(EvaluationError::InvalidPath(format!(
                    "edge {edge} does not connect {vertex} and {next}"
                )));
            }
            vertex = next;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greql_core::automaton::{Automaton, AutomatonBuilder, TransitionKind, TypeFilter};
    use greql_core::graph::Direction;
    use greql_core::graph::lpg::LpgStore;

    use crate::config::Config;

    /// `-->{E} -->{E}`, with a free vertex-type check in between.
    fn two_edges() -> Automaton {
        let mut builder = AutomatonBuilder::new();
        let s0 = builder.add_state(false);
        let s1 = builder.add_state(false);
        let s2 = builder.add_state(false);
        let s3 = builder.add_state(true);
        let edge = || TransitionKind::Edge {
            direction: Direction::Outgoing,
            edge_types: TypeFilter::names(["E"]),
        };
        builder
            .add_transition(s0, s1, edge())
            .add_transition(s1, s2, TransitionKind::VertexType {
                types: TypeFilter::names(["Mid"]),
            })
            .add_transition(s2, s3, edge());
        builder.build().unwrap()
    }

    #[test]
    fn test_two_edge_path_and_prefix() {
        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();
        let b = store.create_vertex(&["Mid"]).unwrap();
        let c = store.create_vertex(&[]).unwrap();
        let ab = store.create_edge(a, b, "E").unwrap();
        let bc = store.create_edge(b, c, "E").unwrap();

        let automaton = two_edges();
        let search = PathSearch::new(&store, &automaton);

        let full = Path::from_parts([a, b, c], [ab, bc]).unwrap();
        assert!(search.matches(&full).unwrap());

        let prefix = Path::from_parts([a, b], [ab]).unwrap();
        assert!(!search.matches(&prefix).unwrap());

        // Wrong direction on the second edge.
        let back = Path::from_parts([c, b], [bc]).unwrap();
        assert!(!search.matches(&back).unwrap());
    }

    #[test]
    fn test_free_transition_gates_path() {
        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();
        let b = store.create_vertex(&[]).unwrap();
        let c = store.create_vertex(&[]).unwrap();
        let ab = store.create_edge(a, b, "E").unwrap();
        let bc = store.create_edge(b, c, "E").unwrap();

        let automaton = two_edges();
        let path = Path::from_parts([a, b, c], [ab, bc]).unwrap();
        assert!(!PathSearch::new(&store, &automaton).matches(&path).unwrap());
    }

    #[test]
    fn test_zero_length_path() {
        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();

        let mut builder = AutomatonBuilder::new();
        let s0 = builder.add_state(false);
        let s1 = builder.add_state(true);
        builder.add_transition(s0, s1, TransitionKind::Epsilon);
        let automaton = builder.build().unwrap();

        assert!(PathSearch::new(&store, &automaton).matches(&Path::new(a)).unwrap());
        assert!(!PathSearch::new(&store, &two_edges()).matches(&Path::new(a)).unwrap());
    }

    #[test]
    fn test_marker_budget_counts_positions() {
        let store = LpgStore::new();
        let vs: Vec<_> = (0..4).map(|_| store.create_vertex(&[]).unwrap()).collect();
        let es: Vec<_> = vs.windows(2).map(|w| store.create_edge(w[0], w[1], "E").unwrap()).collect();
        let path = Path::from_parts(vs.clone(), es).unwrap();

        // -->*
        let mut builder = AutomatonBuilder::new();
        let s0 = builder.add_state(true);
        builder.add_transition(s0, s0, TransitionKind::Edge {
            direction: Direction::Outgoing,
            edge_types: TypeFilter::Any,
        });
        let automaton = builder.build().unwrap();

        let tight = PathSearch::new(&store, &automaton).with_config(Config::default().with_max_markers(2));
        assert!(matches!(tight.matches(&path), Err(EvaluationError::BudgetExceeded(_))));

        let enough = PathSearch::new(&store, &automaton).with_config(Config::default().with_max_markers(3));
        assert!(enough.matches(&path).unwrap());
    }

    #[test]
    fn test_invalid_paths() {
        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();
        let b = store.create_vertex(&[]).unwrap();
        let c = store.create_vertex(&[]).unwrap();
        let ab = store.create_edge(a, b, "E").unwrap();

        let automaton = two_edges();
        let search = PathSearch::new(&store, &automaton);

        let disconnected = Path::from_parts([a, c], [ab]).unwrap();
        assert!(matches!(
            search.matches(&disconnected),
            Err(EvaluationError::InvalidPath(_))
        ));
        let missing_edge = Path::from_parts([a, b], [greql_common::types::EdgeId::new(99)]).unwrap();
        assert!(matches!(
            search.matches(&missing_edge),
            Err(EvaluationError::InvalidPath(_))
        ));
        assert!(matches!(
            search.matches(&Path::new(VertexId::new(50))),
            Err(EvaluationError::InvalidPath(_))
        ));
    }
}
