//! Automaton-driven graph search.
//!
//! Every search is a breadth-first traversal over `(vertex, state)` pairs.
//! A pair is expanded once; markers keyed by `(vertex, state)` keep cycles
//! from looping. What the markers record decides what can be rebuilt
//! afterwards:
//!
//! | Operation | Markers | Result |
//! |-----------|---------|--------|
//! | [`is_reachable`](PathSearch::is_reachable) | unit | `bool` |
//! | [`matches`](PathSearch::matches) | none (state sets) | `bool` |
//! | [`reachable_vertices`](PathSearch::reachable_vertices) | unit | vertex set |
//! | [`path_system`](PathSearch::path_system) | first discovery | [`PathSystem`](crate::result::PathSystem) |
//! | [`slice`](PathSearch::slice) | every parent link | [`Slice`](crate::result::Slice) |

mod matches;
mod path_system;
mod reachability;
mod reachable;
mod slice;

use std::time::Instant;

use greql_common::types::VertexId;
use greql_core::automaton::{Automaton, Step, StateId};
use greql_core::graph::GraphAccess;
use greql_core::graph::subgraph::SubgraphFilter;

use crate::config::Config;
use crate::error::{EvaluationError, Result};

/// A search over one graph with one automaton.
///
/// Cheap to create; every operation allocates its own markers and queue.
///
/// # Examples
///
/// ```
/// use greql_core::automaton::{AutomatonBuilder, TransitionKind, TypeFilter};
/// use greql_core::graph::{Direction, lpg::LpgStore};
/// use greql_engine::PathSearch;
///
/// let store = LpgStore::new();
/// let a = store.create_vertex(&["Person"]).unwrap();
/// let b = store.create_vertex(&["Person"]).unwrap();
/// store.create_edge(a, b, "KNOWS").unwrap();
///
/// let mut builder = AutomatonBuilder::new();
/// let s0 = builder.add_state(false);
/// let s1 = builder.add_state(true);
/// builder.add_transition(s0, s1, TransitionKind::Edge {
///     direction: Direction::Outgoing,
///     edge_types: TypeFilter::names(["KNOWS"]),
/// });
/// let automaton = builder.build().unwrap();
///
/// let search = PathSearch::new(&store, &automaton);
/// assert!(search.is_reachable(a, b).unwrap());
/// assert!(!search.is_reachable(b, a).unwrap());
/// ```
pub struct PathSearch<'a, G: GraphAccess + ?Sized> {
    graph: &'a G,
    automaton: &'a Automaton,
    config: Config,
    subgraph: Option<&'a dyn SubgraphFilter>,
}

impl<'a, G: GraphAccess + ?Sized> PathSearch<'a, G> {
    /// Creates an unbounded search over the whole graph.
    pub fn new(graph: &'a G, automaton: &'a Automaton) -> Self {
        Self {
            graph,
            automaton,
            config: Config::default(),
            subgraph: None,
        }
    }

    /// Sets the search limits.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Restricts moves to a subgraph.
    #[must_use]
    pub fn with_subgraph(mut self, subgraph: &'a dyn SubgraphFilter) -> Self {
        self.subgraph = Some(subgraph);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the automaton.
    pub fn automaton(&self) -> &Automaton {
        self.automaton
    }

    fn require_vertex(&self, argument: &'static str, vertex: VertexId) -> Result<()> {
        if self.graph.contains_vertex(vertex) {
            Ok(())
        } else {
            Err(EvaluationError::UnknownVertex { argument, vertex })
        }
    }

    fn guard(&self) -> Result<Guard<'_>> {
        self.config.validate()?;
        Ok(Guard {
            config: &self.config,
            started: Instant::now(),
            version: self.graph.structure_version(),
        })
    }

    /// Replaces `steps` with the moves available at `(vertex, state)`.
    fn expand(&self, vertex: VertexId, state: StateId, steps: &mut Vec<Step>) {
        steps.clear();
        let incidences = if self.automaton.needs_incidences(state) {
            self.graph.incidences(vertex)
        } else {
            Vec::new()
        };
        self.automaton
            .expand_into(self.graph, vertex, state, &incidences, self.subgraph, steps);
    }
}

/// Per-call limit and mutation checks.
struct Guard<'c> {
    config: &'c Config,
    started: Instant,
    version: u64,
}

impl Guard<'_> {
    fn check<G: GraphAccess + ?Sized>(&self, graph: &G, queue_len: usize, markers: usize) -> Result<()> {
        if graph.structure_version() != self.version {
            return Err(EvaluationError::GraphModified);
        }
        if let Some(limit) = self.config.max_queue_len {
            if queue_len > limit {
                return Err(Self::exceeded(format!("queue length {queue_len} over limit {limit}")));
            }
        }
        if let Some(limit) = self.config.max_markers {
            if markers > limit {
                return Err(Self::exceeded(format!("{markers} markers over limit {limit}")));
            }
        }
        if let Some(limit) = self.config.time_limit {
            let elapsed = self.started.elapsed();
            if elapsed > limit {
                return Err(Self::exceeded(format!("ran {elapsed:?}, limit {limit:?}")));
            }
        }
        Ok(())
    }

    fn exceeded(reason: String) -> EvaluationError {
        tracing::warn!("Search aborted: {}", reason);
        EvaluationError::BudgetExceeded(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greql_core::automaton::{AutomatonBuilder, TransitionKind, TypeFilter};
    use greql_core::graph::Direction;
    use greql_core::graph::lpg::LpgStore;

    fn any_edge_star() -> Automaton {
        let mut builder = AutomatonBuilder::new();
        let s0 = builder.add_state(true);
        builder.add_transition(s0, s0, TransitionKind::Edge {
            direction: Direction::Outgoing,
            edge_types: TypeFilter::Any,
        });
        builder.build().unwrap()
    }

    fn chain(store: &LpgStore, len: usize) -> Vec<VertexId> {
        let vertices: Vec<_> = (0..=len).map(|_| store.create_vertex(&[]).unwrap()).collect();
        for w in vertices.windows(2) {
            store.create_edge(w[0], w[1], "E").unwrap();
        }
        vertices
    }

    #[test]
    fn test_marker_budget() {
        let store = LpgStore::new();
        let vs = chain(&store, 20);
        let automaton = any_edge_star();

        let search = PathSearch::new(&store, &automaton).with_config(Config::default().with_max_markers(5));
        let err = search.reachable_vertices(vs[0]).unwrap_err();
        assert!(matches!(err, EvaluationError::BudgetExceeded(_)));

        let search = PathSearch::new(&store, &automaton).with_config(Config::default().with_max_markers(100));
        assert_eq!(search.reachable_vertices(vs[0]).unwrap().len(), 21);
    }

    #[test]
    fn test_invalid_config() {
        let store = LpgStore::new();
        let vs = chain(&store, 1);
        let automaton = any_edge_star();
        let search = PathSearch::new(&store, &automaton).with_config(Config::default().with_max_queue_len(0));
        assert!(matches!(
            search.is_reachable(vs[0], vs[1]),
            Err(EvaluationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_vertex() {
        let store = LpgStore::new();
        let vs = chain(&store, 1);
        let automaton = any_edge_star();
        let search = PathSearch::new(&store, &automaton);
        assert_eq!(
            search.is_reachable(vs[0], VertexId::new(42)),
            Err(EvaluationError::UnknownVertex {
                argument: "target",
                vertex: VertexId::new(42)
            })
        );
        assert_eq!(
            search.path_system(VertexId::new(42)).unwrap_err(),
            EvaluationError::UnknownVertex {
                argument: "root",
                vertex: VertexId::new(42)
            }
        );
    }
}
