//! Graph models and the traversal interface consumed by path search.
//!
//! - [`lpg`] - In-memory attributed (labeled property) graph store
//! - [`subgraph`] - Vertex/edge filters restricting a traversal
//!
//! Search algorithms never touch a concrete store. They go through
//! [`GraphAccess`], which exposes exactly what traversal needs: membership,
//! incidences with their direction, labels and properties.

pub mod lpg;
pub mod subgraph;

use greql_common::types::{EdgeId, PropertyKey, Value, VertexId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Direction of an edge relative to a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Edges leaving the vertex.
    #[serde(alias = "out")]
    Outgoing,
    /// Edges entering the vertex.
    #[serde(alias = "in")]
    Incoming,
    /// Either direction.
    #[default]
    #[serde(alias = "any")]
    Both,
}

impl Direction {
    /// Returns `true` if an incidence with direction `actual` satisfies this
    /// direction requirement.
    #[inline]
    #[must_use]
    pub fn admits(self, actual: Direction) -> bool {
        match self {
            Self::Both => true,
            _ => self == actual,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Outgoing => Self::Incoming,
            Self::Incoming => Self::Outgoing,
            Self::Both => Self::Both,
        }
    }
}

/// One end of an edge as seen from a vertex.
///
/// `direction` is always [`Direction::Outgoing`] or [`Direction::Incoming`].
/// A self-loop yields two incidences at its vertex, one of each direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incidence {
    /// The edge.
    pub edge: EdgeId,
    /// The vertex this incidence belongs to.
    pub vertex: VertexId,
    /// The opposite endpoint.
    pub other: VertexId,
    /// Whether the edge leaves or enters `vertex`.
    pub direction: Direction,
    /// The edge's type name.
    pub edge_type: Arc<str>,
}

/// Read access to a graph for traversal.
///
/// Object safe so evaluators can hold a `&dyn GraphAccess`.
pub trait GraphAccess {
    /// Returns `true` if the vertex exists.
    fn contains_vertex(&self, vertex: VertexId) -> bool;

    /// Returns `true` if the edge exists.
    fn contains_edge(&self, edge: EdgeId) -> bool;

    /// Returns every incidence of `vertex`: outgoing first, then incoming,
    /// each group in insertion order.
    fn incidences(&self, vertex: VertexId) -> Vec<Incidence>;

    /// Returns the incidences of `vertex` that belong to `edge`.
    fn incidences_of_edge(&self, vertex: VertexId, edge: EdgeId) -> Vec<Incidence> {
        self.incidences(vertex)
            .into_iter()
            .filter(|inc| inc.edge == edge)
            .collect()
    }

    /// Returns the labels of `vertex` (empty if it does not exist).
    fn vertex_labels(&self, vertex: VertexId) -> Vec<Arc<str>>;

    /// Returns a property of `vertex`.
    fn vertex_property(&self, vertex: VertexId, key: &PropertyKey) -> Option<Value>;

    /// Counter bumped by every structural mutation (vertex or edge
    /// insertion/deletion). Searches use it to reject concurrent mutation.
    fn structure_version(&self) -> u64 {
        0
    }
}

impl<G: GraphAccess + ?Sized> GraphAccess for &G {
    fn contains_vertex(&self, vertex: VertexId) -> bool {
        (**self).contains_vertex(vertex)
    }

    fn contains_edge(&self, edge: EdgeId) -> bool {
        (**self).contains_edge(edge)
    }

    fn incidences(&self, vertex: VertexId) -> Vec<Incidence> {
        (**self).incidences(vertex)
    }

    fn incidences_of_edge(&self, vertex: VertexId, edge: EdgeId) -> Vec<Incidence> {
        (**self).incidences_of_edge(vertex, edge)
    }

    fn vertex_labels(&self, vertex: VertexId) -> Vec<Arc<str>> {
        (**self).vertex_labels(vertex)
    }

    fn vertex_property(&self, vertex: VertexId, key: &PropertyKey) -> Option<Value> {
        (**self).vertex_property(vertex, key)
    }

    fn structure_version(&self) -> u64 {
        (**self).structure_version()
    }
}

impl<G: GraphAccess + ?Sized> GraphAccess for Arc<G> {
    fn contains_vertex(&self, vertex: VertexId) -> bool {
        (**self).contains_vertex(vertex)
    }

    fn contains_edge(&self, edge: EdgeId) -> bool {
        (**self).contains_edge(edge)
    }

    fn incidences(&self, vertex: VertexId) -> Vec<Incidence> {
        (**self).incidences(vertex)
    }

    fn incidences_of_edge(&self, vertex: VertexId, edge: EdgeId) -> Vec<Incidence> {
        (**self).incidences_of_edge(vertex, edge)
    }

    fn vertex_labels(&self, vertex: VertexId) -> Vec<Arc<str>> {
        (**self).vertex_labels(vertex)
    }

    fn vertex_property(&self, vertex: VertexId, key: &PropertyKey) -> Option<Value> {
        (**self).vertex_property(vertex, key)
    }

    fn structure_version(&self) -> u64 {
        (**self).structure_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_admits() {
        assert!(Direction::Both.admits(Direction::Outgoing));
        assert!(Direction::Both.admits(Direction::Incoming));
        assert!(Direction::Outgoing.admits(Direction::Outgoing));
        assert!(!Direction::Outgoing.admits(Direction::Incoming));
        assert_eq!(Direction::Incoming.reverse(), Direction::Outgoing);
    }
}
