//! Transitions and their acceptance tests.
//!
//! A transition either consumes an edge (it moves the traversal to the far
//! endpoint of an incidence) or is free (it changes the state only, after
//! checking a condition on the current vertex).

use super::StateId;
use crate::graph::subgraph::SubgraphFilter;
use crate::graph::{Direction, GraphAccess, Incidence};
use greql_common::types::{EdgeId, PropertyKey, Value, VertexId};
use greql_common::utils::hash::FxHashSet;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;

/// Restriction on a type name (edge type or vertex label).
#[derive(Debug, Clone, Default)]
pub enum TypeFilter {
    /// Every type.
    #[default]
    Any,
    /// Only the listed types.
    Names(SmallVec<[Arc<str>; 2]>),
    /// Every type except the listed ones.
    Excluding(SmallVec<[Arc<str>; 2]>),
    /// Types whose whole name matches the pattern.
    Pattern(Regex),
}

impl TypeFilter {
    /// Accepts only the given names.
    pub fn names<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::Names(names.into_iter().map(|n| Arc::from(n.as_ref())).collect())
    }

    /// Accepts everything but the given names.
    pub fn excluding<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::Excluding(names.into_iter().map(|n| Arc::from(n.as_ref())).collect())
    }

    /// Accepts names matching `pattern` in full.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{pattern})$")).map(Self::Pattern)
    }

    /// Returns `true` if `name` passes the filter.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Names(names) => names.iter().any(|n| n.as_ref() == name),
            Self::Excluding(names) => !names.iter().any(|n| n.as_ref() == name),
            Self::Pattern(re) => re.is_match(name),
        }
    }
}

/// What a transition tests.
#[derive(Debug, Clone)]
pub enum TransitionKind {
    /// Crosses an incident edge in `direction` whose type passes the filter.
    Edge {
        /// Required direction relative to the current vertex.
        direction: Direction,
        /// Allowed edge types.
        edge_types: TypeFilter,
    },
    /// Crosses exactly one given edge.
    BoundEdge {
        /// The edge.
        edge: EdgeId,
        /// Required direction relative to the current vertex.
        direction: Direction,
    },
    /// Requires a label of the current vertex to pass the filter.
    VertexType {
        /// Allowed labels.
        types: TypeFilter,
    },
    /// Requires the current vertex to be one of a set.
    Vertex {
        /// Allowed vertices.
        vertices: FxHashSet<VertexId>,
    },
    /// Requires a property of the current vertex to equal a value.
    Property {
        /// Property key.
        key: PropertyKey,
        /// Required value.
        value: Value,
    },
    /// Always taken.
    Epsilon,
}

impl TransitionKind {
    /// Returns `true` for kinds that cross an edge.
    #[inline]
    #[must_use]
    pub fn consumes_edge(&self) -> bool {
        matches!(self, Self::Edge { .. } | Self::BoundEdge { .. })
    }
}

/// An edge of the automaton: a test plus the state it leads to.
#[derive(Debug, Clone)]
pub struct Transition {
    /// State entered when the transition fires.
    pub end_state: StateId,
    /// The test.
    pub kind: TransitionKind,
}

impl Transition {
    /// Creates a transition.
    #[must_use]
    pub fn new(end_state: StateId, kind: TransitionKind) -> Self {
        Self { end_state, kind }
    }

    /// Creates an epsilon transition.
    #[must_use]
    pub fn epsilon(end_state: StateId) -> Self {
        Self::new(end_state, TransitionKind::Epsilon)
    }

    /// Creates a transition crossing any edge in `direction`.
    #[must_use]
    pub fn edge(end_state: StateId, direction: Direction) -> Self {
        Self::new(
            end_state,
            TransitionKind::Edge {
                direction,
                edge_types: TypeFilter::Any,
            },
        )
    }

    /// Returns `true` if firing this transition crosses an edge.
    #[inline]
    #[must_use]
    pub fn consumes_edge(&self) -> bool {
        self.kind.consumes_edge()
    }

    /// Tests the transition at `vertex`.
    ///
    /// Consuming kinds need an incidence of `vertex` and reject `None`; free
    /// kinds ignore it. The subgraph filter, when given, must include both
    /// the crossed edge and the vertex it leads to.
    pub fn accepts<G: GraphAccess + ?Sized>(
        &self,
        graph: &G,
        vertex: VertexId,
        incidence: Option<&Incidence>,
        filter: Option<&dyn SubgraphFilter>,
    ) -> bool {
        match &self.kind {
            TransitionKind::Edge {
                direction,
                edge_types,
            } => incidence.is_some_and(|inc| {
                direction.admits(inc.direction)
                    && edge_types.accepts(&inc.edge_type)
                    && Self::filter_admits(filter, inc)
            }),
            TransitionKind::BoundEdge { edge, direction } => incidence.is_some_and(|inc| {
                inc.edge == *edge && direction.admits(inc.direction) && Self::filter_admits(filter, inc)
            }),
            TransitionKind::VertexType { types } => graph
                .vertex_labels(vertex)
                .iter()
                .any(|label| types.accepts(label)),
            TransitionKind::Vertex { vertices } => vertices.contains(&vertex),
            TransitionKind::Property { key, value } => graph
                .vertex_property(vertex, key)
                .is_some_and(|actual| actual == *value),
            TransitionKind::Epsilon => true,
        }
    }

    /// Returns the vertex the traversal is at after firing.
    #[inline]
    #[must_use]
    pub fn next_vertex(&self, vertex: VertexId, incidence: Option<&Incidence>) -> VertexId {
        match (self.consumes_edge(), incidence) {
            (true, Some(inc)) => inc.other,
            _ => vertex,
        }
    }

    fn filter_admits(filter: Option<&dyn SubgraphFilter>, inc: &Incidence) -> bool {
        filter.is_none_or(|f| f.includes_edge(inc.edge) && f.includes_vertex(inc.other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::lpg::LpgStore;
    use crate::graph::subgraph::Subgraph;

    #[test]
    fn test_type_filter() {
        assert!(TypeFilter::Any.accepts("Anything"));
        let names = TypeFilter::names(["Extends", "Implements"]);
        assert!(names.accepts("Extends"));
        assert!(!names.accepts("Uses"));
        let excl = TypeFilter::excluding(["Uses"]);
        assert!(excl.accepts("Extends"));
        assert!(!excl.accepts("Uses"));
        let pat = TypeFilter::pattern("Is.*Of").unwrap();
        assert!(pat.accepts("IsPartOf"));
        // Anchored on both ends.
        assert!(!pat.accepts("XIsPartOfY"));
        assert!(TypeFilter::pattern("(").is_err());
    }

    #[test]
    fn test_edge_transition() {
        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();
        let b = store.create_vertex(&[]).unwrap();
        let e = store.create_edge(a, b, "Knows").unwrap();

        let out = Transition::new(
            StateId::new(1),
            TransitionKind::Edge {
                direction: Direction::Outgoing,
                edge_types: TypeFilter::names(["Knows"]),
            },
        );
        let at_a = store.incidences(a);
        let at_b = store.incidences(b);

        assert!(out.consumes_edge());
        assert!(out.accepts(&store, a, at_a.first(), None));
        assert!(!out.accepts(&store, b, at_b.first(), None));
        assert!(!out.accepts(&store, a, None, None));
        assert_eq!(out.next_vertex(a, at_a.first()), b);

        let sub = Subgraph::from_parts([a], [e]);
        // Far endpoint outside the subgraph.
        assert!(!out.accepts(&store, a, at_a.first(), Some(&sub)));

        let bound = Transition::new(
            StateId::new(1),
            TransitionKind::BoundEdge {
                edge: e,
                direction: Direction::Both,
            },
        );
        assert!(bound.accepts(&store, b, at_b.first(), None));
        assert_eq!(bound.next_vertex(b, at_b.first()), a);
    }

    #[test]
    fn test_free_transitions() {
        let store = LpgStore::new();
        let a = store.create_vertex_with_props(&["Class"], [("abstract", true)]).unwrap();
        let b = store.create_vertex(&["Package"]).unwrap();

        let ty = Transition::new(
            StateId::new(0),
            TransitionKind::VertexType {
                types: TypeFilter::names(["Class"]),
            },
        );
        assert!(!ty.consumes_edge());
        assert!(ty.accepts(&store, a, None, None));
        assert!(!ty.accepts(&store, b, None, None));
        assert_eq!(ty.next_vertex(a, None), a);

        let prop = Transition::new(
            StateId::new(0),
            TransitionKind::Property {
                key: PropertyKey::new("abstract"),
                value: Value::Bool(true),
            },
        );
        assert!(prop.accepts(&store, a, None, None));
        assert!(!prop.accepts(&store, b, None, None));

        let restrict = Transition::new(
            StateId::new(0),
            TransitionKind::Vertex {
                vertices: [b].into_iter().collect(),
            },
        );
        assert!(restrict.accepts(&store, b, None, None));
        assert!(!restrict.accepts(&store, a, None, None));
        assert!(Transition::epsilon(StateId::new(0)).accepts(&store, a, None, None));
    }
}
