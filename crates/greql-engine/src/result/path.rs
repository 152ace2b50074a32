//! Paths: a start vertex followed by (edge, vertex) steps.

use greql_common::types::{EdgeId, VertexId};
use greql_common::utils::hash::FxHashSet;
use smallvec::SmallVec;
use std::fmt;

/// A walk through the graph.
///
/// Holds `length() + 1` vertices and `length()` edges; edge `i` connects
/// vertex `i` and vertex `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    vertices: SmallVec<[VertexId; 8]>,
    edges: SmallVec<[EdgeId; 8]>,
}

impl Path {
    /// Creates the zero-length path at `start`.
    #[must_use]
    pub fn new(start: VertexId) -> Self {
        let mut vertices = SmallVec::new();
        vertices.push(start);
        Self {
            vertices,
            edges: SmallVec::new(),
        }
    }

    /// Creates a path from its traces.
    ///
    /// Returns `None` unless there is exactly one more vertex than edges.
    #[must_use]
    pub fn from_parts(
        vertices: impl IntoIterator<Item = VertexId>,
        edges: impl IntoIterator<Item = EdgeId>,
    ) -> Option<Self> {
        let vertices: SmallVec<[VertexId; 8]> = vertices.into_iter().collect();
        let edges: SmallVec<[EdgeId; 8]> = edges.into_iter().collect();
        (vertices.len() == edges.len() + 1).then_some(Self { vertices, edges })
    }

    /// Extends the path by one step.
    pub fn append(&mut self, edge: EdgeId, vertex: VertexId) {
        self.edges.push(edge);
        self.vertices.push(vertex);
    }

    /// Returns the first vertex.
    #[must_use]
    pub fn start_vertex(&self) -> VertexId {
        self.vertices[0]
    }

    /// Returns the last vertex.
    #[must_use]
    pub fn end_vertex(&self) -> VertexId {
        self.vertices[self.vertices.len() - 1]
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn length(&self) -> usize {
        self.edges.len()
    }

    /// Returns the vertices in order.
    #[must_use]
    pub fn vertex_trace(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Returns the edges in order.
    #[must_use]
    pub fn edge_trace(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Returns `true` if the path visits `vertex`.
    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Returns `true` if the path crosses `edge`.
    #[must_use]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }

    /// Returns the number of path edges incident to `vertex`.
    ///
    /// An edge crossed twice counts twice; a self-loop counts once.
    #[must_use]
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.vertices
            .windows(2)
            .filter(|w| w[0] == vertex || w[1] == vertex)
            .count()
    }

    /// Iterates over the `(edge, vertex)` steps after the start vertex.
    pub fn steps(&self) -> impl ExactSizeIterator<Item = (EdgeId, VertexId)> + '_ {
        self.edges
            .iter()
            .copied()
            .zip(self.vertices[1..].iter().copied())
    }

    /// Returns the same walk traversed backwards.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            vertices: self.vertices.iter().rev().copied().collect(),
            edges: self.edges.iter().rev().copied().collect(),
        }
    }

    /// Returns `true` if no edge is crossed twice.
    #[must_use]
    pub fn is_trail(&self) -> bool {
        let mut seen = FxHashSet::default();
        self.edges.iter().all(|e| seen.insert(*e))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start_vertex())?;
        for (edge, vertex) in self.steps() {
            write!(f, " -{edge}-> {vertex}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: u64) -> VertexId {
        VertexId::new(i)
    }

    fn e(i: u64) -> EdgeId {
        EdgeId::new(i)
    }

    #[test]
    fn test_build_and_query() {
        let mut path = Path::new(v(0));
        assert_eq!(path.length(), 0);
        assert_eq!(path.start_vertex(), path.end_vertex());

        path.append(e(10), v(1));
        path.append(e(11), v(2));

        assert_eq!(path.length(), 2);
        assert_eq!(path.end_vertex(), v(2));
        assert_eq!(path.vertex_trace(), &[v(0), v(1), v(2)]);
        assert_eq!(path.edge_trace(), &[e(10), e(11)]);
        assert!(path.contains_vertex(v(1)));
        assert!(!path.contains_edge(e(12)));
        assert_eq!(path.degree(v(1)), 2);
        assert_eq!(path.degree(v(0)), 1);
        assert_eq!(path.to_string(), "v0 -e10-> v1 -e11-> v2");
    }

    #[test]
    fn test_from_parts_checks_shape() {
        assert!(Path::from_parts([v(0), v(1)], [e(0)]).is_some());
        assert!(Path::from_parts([v(0)], [e(0)]).is_none());
        assert!(Path::from_parts([], []).is_none());
    }

    #[test]
    fn test_reversed_and_trail() {
        let path = Path::from_parts([v(0), v(1), v(0)], [e(5), e(5)]).unwrap();
        assert!(!path.is_trail());
        assert_eq!(path.reversed().edge_trace(), &[e(5), e(5)]);

        let path = Path::from_parts([v(0), v(1), v(2)], [e(1), e(2)]).unwrap();
        let back = path.reversed();
        assert!(back.is_trail());
        assert_eq!(back.start_vertex(), v(2));
        assert_eq!(back.steps().collect::<Vec<_>>(), vec![(e(2), v(1)), (e(1), v(0))]);
    }
}
