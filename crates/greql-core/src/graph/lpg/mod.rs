//! Labeled property graph model.
//!
//! Vertices carry a set of labels (their types) and properties; edges are
//! directed, carry exactly one type and properties.

mod property;
mod store;

pub use property::{ElementId, PropertyColumn, PropertyStorage};
pub use store::{LpgStore, LpgStoreConfig, MAX_LABELS};

use greql_common::types::{EdgeId, PropertyKey, Value, VertexId};
use greql_common::utils::hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::Arc;

/// A vertex materialized from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Identifier.
    pub id: VertexId,
    /// Labels in the order they were interned.
    pub labels: SmallVec<[Arc<str>; 2]>,
    /// Properties.
    pub properties: FxHashMap<PropertyKey, Value>,
}

impl Vertex {
    /// Creates a vertex without labels or properties.
    #[must_use]
    pub fn new(id: VertexId) -> Self {
        Self {
            id,
            labels: SmallVec::new(),
            properties: FxHashMap::default(),
        }
    }

    /// Returns `true` if the vertex carries `label`.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.as_ref() == label)
    }

    /// Returns a property value.
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// An edge materialized from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Identifier.
    pub id: EdgeId,
    /// Source (alpha) vertex.
    pub src: VertexId,
    /// Target (omega) vertex.
    pub dst: VertexId,
    /// Type name.
    pub edge_type: Arc<str>,
    /// Properties.
    pub properties: FxHashMap<PropertyKey, Value>,
}

impl Edge {
    /// Creates an edge without properties.
    #[must_use]
    pub fn new(id: EdgeId, src: VertexId, dst: VertexId, edge_type: Arc<str>) -> Self {
        Self {
            id,
            src,
            dst,
            edge_type,
            properties: FxHashMap::default(),
        }
    }

    /// Returns the endpoint opposite to `vertex`, or `None` if `vertex` is
    /// not an endpoint.
    #[must_use]
    pub fn other_endpoint(&self, vertex: VertexId) -> Option<VertexId> {
        if vertex == self.src {
            Some(self.dst)
        } else if vertex == self.dst {
            Some(self.src)
        } else {
            None
        }
    }
}

/// Stored vertex header: label bitmap and tombstone.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VertexRecord {
    label_bits: u64,
    deleted: bool,
}

impl VertexRecord {
    pub(crate) const fn new() -> Self {
        Self {
            label_bits: 0,
            deleted: false,
        }
    }

    pub(crate) fn set_label_bit(&mut self, bit: u8) {
        self.label_bits |= 1 << bit;
    }

    pub(crate) fn label_bits_iter(self) -> impl Iterator<Item = u8> {
        (0..64u8).filter(move |&bit| self.label_bits & (1 << bit) != 0)
    }

    pub(crate) const fn is_deleted(self) -> bool {
        self.deleted
    }

    pub(crate) fn set_deleted(&mut self) {
        self.deleted = true;
    }
}

/// Stored edge header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EdgeRecord {
    pub(crate) src: VertexId,
    pub(crate) dst: VertexId,
    pub(crate) type_id: u32,
    deleted: bool,
}

impl EdgeRecord {
    pub(crate) const fn new(src: VertexId, dst: VertexId, type_id: u32) -> Self {
        Self {
            src,
            dst,
            type_id,
            deleted: false,
        }
    }

    pub(crate) const fn is_deleted(self) -> bool {
        self.deleted
    }

    pub(crate) fn set_deleted(&mut self) {
        self.deleted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_bits() {
        let mut record = VertexRecord::new();
        record.set_label_bit(0);
        record.set_label_bit(5);
        assert_eq!(record.label_bits_iter().collect::<Vec<_>>(), vec![0, 5]);
    }

    #[test]
    fn test_other_endpoint() {
        let edge = Edge::new(EdgeId::new(0), VertexId::new(1), VertexId::new(2), "E".into());
        assert_eq!(edge.other_endpoint(VertexId::new(1)), Some(VertexId::new(2)));
        assert_eq!(edge.other_endpoint(VertexId::new(2)), Some(VertexId::new(1)));
        assert_eq!(edge.other_endpoint(VertexId::new(3)), None);
    }
}
