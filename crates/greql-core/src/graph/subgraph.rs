//! Subgraph restrictions for traversal.

use super::lpg::LpgStore;
use super::GraphAccess;
use greql_common::types::{EdgeId, VertexId};
use greql_common::utils::hash::FxHashSet;

/// Decides which vertices and edges a traversal may use.
pub trait SubgraphFilter {
    /// Returns `true` if the traversal may enter `vertex`.
    fn includes_vertex(&self, vertex: VertexId) -> bool;

    /// Returns `true` if the traversal may cross `edge`.
    fn includes_edge(&self, edge: EdgeId) -> bool;
}

/// An explicit set of vertices and edges.
///
/// An edge is only usable if its far endpoint is in the vertex set too; the
/// automaton enforces that when it consults the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subgraph {
    vertices: FxHashSet<VertexId>,
    edges: FxHashSet<EdgeId>,
}

impl Subgraph {
    /// Creates an empty subgraph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a subgraph from explicit sets.
    pub fn from_parts(
        vertices: impl IntoIterator<Item = VertexId>,
        edges: impl IntoIterator<Item = EdgeId>,
    ) -> Self {
        Self {
            vertices: vertices.into_iter().collect(),
            edges: edges.into_iter().collect(),
        }
    }

    /// Builds the subgraph induced by vertex labels and edge types.
    ///
    /// Keeps every vertex carrying one of `labels` and every edge of one of
    /// `edge_types` whose endpoints were both kept.
    #[must_use]
    pub fn from_types(store: &LpgStore, labels: &[&str], edge_types: &[&str]) -> Self {
        let vertices: FxHashSet<VertexId> = labels
            .iter()
            .flat_map(|label| store.vertices_by_label(label))
            .collect();

        let edges = edge_types
            .iter()
            .flat_map(|ty| store.edges_by_type(ty))
            .filter(|&edge| {
                store.get_edge(edge).is_some_and(|e| {
                    vertices.contains(&e.src) && vertices.contains(&e.dst)
                })
            })
            .collect();

        Self { vertices, edges }
    }

    /// Builds the subgraph induced by `vertices`: those that exist in
    /// `graph` plus every edge running between two of them.
    #[must_use]
    pub fn induced<G: GraphAccess + ?Sized>(graph: &G, vertices: &[VertexId]) -> Self {
        let vertex_set: FxHashSet<VertexId> = vertices
            .iter()
            .copied()
            .filter(|&v| graph.contains_vertex(v))
            .collect();
        let edges = vertex_set
            .iter()
            .flat_map(|&v| graph.incidences(v))
            .filter(|inc| vertex_set.contains(&inc.other))
            .map(|inc| inc.edge)
            .collect();
        Self {
            vertices: vertex_set,
            edges,
        }
    }

    /// Adds a vertex.
    pub fn add_vertex(&mut self, vertex: VertexId) -> bool {
        self.vertices.insert(vertex)
    }

    /// Adds an edge.
    pub fn add_edge(&mut self, edge: EdgeId) -> bool {
        self.edges.insert(edge)
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl SubgraphFilter for Subgraph {
    fn includes_vertex(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }

    fn includes_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }
}
