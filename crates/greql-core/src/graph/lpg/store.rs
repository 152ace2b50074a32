//! LPG graph store implementation.

use super::{Edge, EdgeRecord, PropertyStorage, Vertex, VertexRecord};
use crate::graph::{Direction, GraphAccess, Incidence};
use crate::index::adjacency::ChunkedAdjacency;
use greql_common::types::{EdgeId, PropertyKey, Value, VertexId};
use greql_common::utils::error::{Error, Result};
use greql_common::utils::hash::{FxHashMap, FxHashSet};
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinct vertex labels a store can intern; each vertex keeps a 64-bit
/// label bitmap.
pub const MAX_LABELS: usize = 64;

/// Configuration for the LPG store.
#[derive(Debug, Clone)]
pub struct LpgStoreConfig {
    /// Whether to maintain backward adjacency lists.
    ///
    /// Without them, incoming incidences are invisible to traversals.
    pub backward_edges: bool,
    /// Initial capacity for vertices.
    pub initial_vertex_capacity: usize,
    /// Initial capacity for edges.
    pub initial_edge_capacity: usize,
}

impl Default for LpgStoreConfig {
    fn default() -> Self {
        Self {
            backward_edges: true,
            initial_vertex_capacity: 1024,
            initial_edge_capacity: 4096,
        }
    }
}

/// The in-memory attributed graph store.
///
/// Vertices and edges get dense ids in creation order. All methods take
/// `&self`; the store is internally synchronized and can be shared through
/// an `Arc`.
pub struct LpgStore {
    config: LpgStoreConfig,

    vertices: RwLock<FxHashMap<VertexId, VertexRecord>>,

    edges: RwLock<FxHashMap<EdgeId, EdgeRecord>>,

    vertex_properties: PropertyStorage<VertexId>,

    edge_properties: PropertyStorage<EdgeId>,

    /// Label name to ID mapping.
    label_to_id: RwLock<FxHashMap<Arc<str>, u8>>,

    /// Label ID to name mapping.
    id_to_label: RwLock<Vec<Arc<str>>>,

    /// Edge type name to ID mapping.
    edge_type_to_id: RwLock<FxHashMap<Arc<str>, u32>>,

    /// Edge type ID to name mapping.
    id_to_edge_type: RwLock<Vec<Arc<str>>>,

    /// Outgoing edges.
    forward_adj: ChunkedAdjacency,

    /// Incoming edges, if `config.backward_edges` is set.
    backward_adj: Option<ChunkedAdjacency>,

    /// Label index: label_id -> set of vertex IDs.
    label_index: RwLock<Vec<FxHashSet<VertexId>>>,

    next_vertex_id: AtomicU64,

    next_edge_id: AtomicU64,

    /// Bumped on every structural mutation.
    structure_version: AtomicU64,
}

impl LpgStore {
    /// Creates a new LPG store with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LpgStoreConfig::default())
    }

    /// Creates a new LPG store with custom configuration.
    #[must_use]
    pub fn with_config(config: LpgStoreConfig) -> Self {
        let backward_adj = if config.backward_edges {
            Some(ChunkedAdjacency::new())
        } else {
            None
        };

        let mut vertices = FxHashMap::default();
        vertices.reserve(config.initial_vertex_capacity);
        let mut edges = FxHashMap::default();
        edges.reserve(config.initial_edge_capacity);

        Self {
            vertices: RwLock::new(vertices),
            edges: RwLock::new(edges),
            vertex_properties: PropertyStorage::new(),
            edge_properties: PropertyStorage::new(),
            label_to_id: RwLock::new(FxHashMap::default()),
            id_to_label: RwLock::new(Vec::new()),
            edge_type_to_id: RwLock::new(FxHashMap::default()),
            id_to_edge_type: RwLock::new(Vec::new()),
            forward_adj: ChunkedAdjacency::new(),
            backward_adj,
            label_index: RwLock::new(Vec::new()),
            next_vertex_id: AtomicU64::new(0),
            next_edge_id: AtomicU64::new(0),
            structure_version: AtomicU64::new(0),
            config,
        }
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &LpgStoreConfig {
        &self.config
    }

    fn bump_version(&self) {
        self.structure_version.fetch_add(1, Ordering::AcqRel);
    }

    // === Vertex Operations ===

    /// Creates a new vertex with the given labels.
    ///
    /// # Errors
    ///
    /// Returns `Error::TooManyLabels` if a new label would exceed
    /// [`MAX_LABELS`]; no vertex is created then.
    pub fn create_vertex(&self, labels: &[&str]) -> Result<VertexId> {
        let label_ids = labels
            .iter()
            .map(|label| self.get_or_create_label_id(label))
            .collect::<Result<SmallVec<[u8; 4]>>>()?;
        let id = VertexId::new(self.next_vertex_id.fetch_add(1, Ordering::Relaxed));

        let mut record = VertexRecord::new();
        for label_id in label_ids {
            record.set_label_bit(label_id);

            let mut index = self.label_index.write();
            while index.len() <= label_id as usize {
                index.push(FxHashSet::default());
            }
            index[label_id as usize].insert(id);
        }

        self.vertices.write().insert(id, record);
        self.bump_version();
        Ok(id)
    }

    /// Creates a new vertex with labels and properties.
    ///
    /// # Errors
    ///
    /// Same as [`create_vertex`](Self::create_vertex).
    pub fn create_vertex_with_props(
        &self,
        labels: &[&str],
        properties: impl IntoIterator<Item = (impl Into<PropertyKey>, impl Into<Value>)>,
    ) -> Result<VertexId> {
        let id = self.create_vertex(labels)?;
        for (key, value) in properties {
            self.vertex_properties.set(id, key.into(), value.into());
        }
        Ok(id)
    }

    /// Gets a vertex by ID.
    #[must_use]
    pub fn get_vertex(&self, id: VertexId) -> Option<Vertex> {
        let record = *self.vertices.read().get(&id)?;
        if record.is_deleted() {
            return None;
        }

        let mut vertex = Vertex::new(id);
        let id_to_label = self.id_to_label.read();
        for bit in record.label_bits_iter() {
            if let Some(label) = id_to_label.get(bit as usize) {
                vertex.labels.push(label.clone());
            }
        }
        vertex.properties = self.vertex_properties.get_all(id);

        Some(vertex)
    }

    /// Sets a vertex property.
    pub fn set_vertex_property(&self, id: VertexId, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Result<()> {
        if !self.contains_vertex(id) {
            return Err(Error::VertexNotFound(id));
        }
        self.vertex_properties.set(id, key.into(), value.into());
        Ok(())
    }

    /// Deletes a vertex and all its incident edges.
    pub fn delete_vertex(&self, id: VertexId) -> bool {
        let labels: Vec<u8> = {
            let mut vertices = self.vertices.write();
            match vertices.get_mut(&id) {
                Some(record) if !record.is_deleted() => {
                    record.set_deleted();
                    record.label_bits_iter().collect()
                }
                _ => return false,
            }
        };

        {
            let mut index = self.label_index.write();
            for bit in labels {
                if let Some(set) = index.get_mut(bit as usize) {
                    set.remove(&id);
                }
            }
        }

        let incident: Vec<EdgeId> = self
            .forward_adj
            .edges_from(id)
            .chain(
                self.backward_adj
                    .iter()
                    .flat_map(|adj| adj.edges_from(id)),
            )
            .map(|(_, edge)| edge)
            .collect();
        for edge in incident {
            self.delete_edge(edge);
        }

        self.vertex_properties.remove_all(id);
        self.bump_version();
        true
    }

    /// Returns the number of live vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices
            .read()
            .values()
            .filter(|r| !r.is_deleted())
            .count()
    }

    /// Returns the ids of all live vertices in ascending order.
    #[must_use]
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        let mut ids: Vec<VertexId> = self
            .vertices
            .read()
            .iter()
            .filter(|(_, r)| !r.is_deleted())
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    // === Edge Operations ===

    /// Creates a new edge from `src` to `dst`.
    pub fn create_edge(&self, src: VertexId, dst: VertexId, edge_type: &str) -> Result<EdgeId> {
        for endpoint in [src, dst] {
            if !self.contains_vertex(endpoint) {
                return Err(Error::VertexNotFound(endpoint));
            }
        }

        let id = EdgeId::new(self.next_edge_id.fetch_add(1, Ordering::Relaxed));
        let type_id = self.get_or_create_edge_type_id(edge_type);

        self.edges
            .write()
            .insert(id, EdgeRecord::new(src, dst, type_id));

        self.forward_adj.add_edge(src, dst, id);
        if let Some(ref backward) = self.backward_adj {
            backward.add_edge(dst, src, id);
        }

        self.bump_version();
        Ok(id)
    }

    /// Creates a new edge with properties.
    pub fn create_edge_with_props(
        &self,
        src: VertexId,
        dst: VertexId,
        edge_type: &str,
        properties: impl IntoIterator<Item = (impl Into<PropertyKey>, impl Into<Value>)>,
    ) -> Result<EdgeId> {
        let id = self.create_edge(src, dst, edge_type)?;
        for (key, value) in properties {
            self.edge_properties.set(id, key.into(), value.into());
        }
        Ok(id)
    }

    /// Gets an edge by ID.
    #[must_use]
    pub fn get_edge(&self, id: EdgeId) -> Option<Edge> {
        let record = *self.edges.read().get(&id)?;
        if record.is_deleted() {
            return None;
        }

        let edge_type = self.edge_type_name(record.type_id)?;
        let mut edge = Edge::new(id, record.src, record.dst, edge_type);
        edge.properties = self.edge_properties.get_all(id);

        Some(edge)
    }

    /// Returns an edge property.
    #[must_use]
    pub fn edge_property(&self, id: EdgeId, key: &PropertyKey) -> Option<Value> {
        self.edge_properties.get(id, key)
    }

    /// Deletes an edge.
    pub fn delete_edge(&self, id: EdgeId) -> bool {
        let (src, dst) = {
            let mut edges = self.edges.write();
            match edges.get_mut(&id) {
                Some(record) if !record.is_deleted() => {
                    record.set_deleted();
                    (record.src, record.dst)
                }
                _ => return false,
            }
        };

        self.forward_adj.mark_deleted(src, id);
        if let Some(ref backward) = self.backward_adj {
            backward.mark_deleted(dst, id);
        }
        self.edge_properties.remove_all(id);

        self.bump_version();
        true
    }

    /// Returns the number of live edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.forward_adj.active_edge_count()
    }

    // === Traversal ===

    /// Returns the neighbors of a vertex in the given direction.
    pub fn neighbors(&self, vertex: VertexId, direction: Direction) -> impl Iterator<Item = VertexId> + '_ {
        let forward: Box<dyn Iterator<Item = VertexId> + '_> = match direction {
            Direction::Outgoing | Direction::Both => Box::new(self.forward_adj.neighbors(vertex)),
            Direction::Incoming => Box::new(std::iter::empty()),
        };

        let backward: Box<dyn Iterator<Item = VertexId> + '_> = match (direction, &self.backward_adj) {
            (Direction::Incoming | Direction::Both, Some(adj)) => Box::new(adj.neighbors(vertex)),
            _ => Box::new(std::iter::empty()),
        };

        forward.chain(backward)
    }

    /// Returns the number of incidences of a vertex in the given direction.
    #[must_use]
    pub fn degree(&self, vertex: VertexId, direction: Direction) -> usize {
        let out = self.forward_adj.degree(vertex);
        let inc = self.backward_adj.as_ref().map_or(0, |adj| adj.degree(vertex));
        match direction {
            Direction::Outgoing => out,
            Direction::Incoming => inc,
            Direction::Both => out + inc,
        }
    }

    /// Returns the vertices carrying `label`, in ascending id order.
    #[must_use]
    pub fn vertices_by_label(&self, label: &str) -> Vec<VertexId> {
        let Some(&label_id) = self.label_to_id.read().get(label) else {
            return Vec::new();
        };
        let index = self.label_index.read();
        let mut ids: Vec<VertexId> = index
            .get(label_id as usize)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Returns the live edges of type `edge_type`, in ascending id order.
    #[must_use]
    pub fn edges_by_type(&self, edge_type: &str) -> Vec<EdgeId> {
        let Some(&type_id) = self.edge_type_to_id.read().get(edge_type) else {
            return Vec::new();
        };
        let mut ids: Vec<EdgeId> = self
            .edges
            .read()
            .iter()
            .filter(|(_, r)| !r.is_deleted() && r.type_id == type_id)
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Returns every interned label.
    #[must_use]
    pub fn labels(&self) -> Vec<Arc<str>> {
        self.id_to_label.read().clone()
    }

    /// Returns every interned edge type.
    #[must_use]
    pub fn edge_types(&self) -> Vec<Arc<str>> {
        self.id_to_edge_type.read().clone()
    }

    /// Compacts the adjacency lists, reclaiming deleted edges.
    pub fn compact(&self) {
        self.forward_adj.compact();
        if let Some(ref backward) = self.backward_adj {
            backward.compact();
        }
    }

    // === Internal Helpers ===

    fn edge_type_name(&self, type_id: u32) -> Option<Arc<str>> {
        self.id_to_edge_type.read().get(type_id as usize).cloned()
    }

    fn incidence(&self, vertex: VertexId, other: VertexId, edge: EdgeId, direction: Direction) -> Option<Incidence> {
        let type_id = self.edges.read().get(&edge)?.type_id;
        Some(Incidence {
            edge,
            vertex,
            other,
            direction,
            edge_type: self.edge_type_name(type_id)?,
        })
    }

    fn get_or_create_label_id(&self, label: &str) -> Result<u8> {
        {
            let label_to_id = self.label_to_id.read();
            if let Some(&id) = label_to_id.get(label) {
                return Ok(id);
            }
        }

        let mut label_to_id = self.label_to_id.write();
        let mut id_to_label = self.id_to_label.write();

        // Double-check after acquiring write lock
        if let Some(&id) = label_to_id.get(label) {
            return Ok(id);
        }

        let id = match u8::try_from(id_to_label.len()) {
            Ok(id) if usize::from(id) < MAX_LABELS => id,
            _ => return Err(Error::TooManyLabels(MAX_LABELS)),
        };

        let label: Arc<str> = label.into();
        label_to_id.insert(label.clone(), id);
        id_to_label.push(label);

        Ok(id)
    }

    fn get_or_create_edge_type_id(&self, edge_type: &str) -> u32 {
        {
            let type_to_id = self.edge_type_to_id.read();
            if let Some(&id) = type_to_id.get(edge_type) {
                return id;
            }
        }

        let mut type_to_id = self.edge_type_to_id.write();
        let mut id_to_type = self.id_to_edge_type.write();

        // Double-check
        if let Some(&id) = type_to_id.get(edge_type) {
            return id;
        }

        let id = id_to_type.len() as u32;
        let edge_type: Arc<str> = edge_type.into();
        type_to_id.insert(edge_type.clone(), id);
        id_to_type.push(edge_type);

        id
    }
}

impl Default for LpgStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphAccess for LpgStore {
    fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertices
            .read()
            .get(&vertex)
            .is_some_and(|r| !r.is_deleted())
    }

    fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges
            .read()
            .get(&edge)
            .is_some_and(|r| !r.is_deleted())
    }

    fn incidences(&self, vertex: VertexId) -> Vec<Incidence> {
        let outgoing = self
            .forward_adj
            .edges_from(vertex)
            .filter_map(|(other, edge)| self.incidence(vertex, other, edge, Direction::Outgoing));
        let incoming = self
            .backward_adj
            .iter()
            .flat_map(|adj| adj.edges_from(vertex))
            .filter_map(|(other, edge)| self.incidence(vertex, other, edge, Direction::Incoming));
        outgoing.chain(incoming).collect()
    }

    fn incidences_of_edge(&self, vertex: VertexId, edge: EdgeId) -> Vec<Incidence> {
        let record = match self.edges.read().get(&edge) {
            Some(r) if !r.is_deleted() => *r,
            _ => return Vec::new(),
        };
        let Some(edge_type) = self.edge_type_name(record.type_id) else {
            return Vec::new();
        };

        let mut result = Vec::with_capacity(2);
        if record.src == vertex {
            result.push(Incidence {
                edge,
                vertex,
                other: record.dst,
                direction: Direction::Outgoing,
                edge_type: edge_type.clone(),
            });
        }
        if record.dst == vertex && self.backward_adj.is_some() {
            result.push(Incidence {
                edge,
                vertex,
                other: record.src,
                direction: Direction::Incoming,
                edge_type,
            });
        }
        result
    }

    fn vertex_labels(&self, vertex: VertexId) -> Vec<Arc<str>> {
        let Some(record) = self.vertices.read().get(&vertex).copied() else {
            return Vec::new();
        };
        if record.is_deleted() {
            return Vec::new();
        }
        let id_to_label = self.id_to_label.read();
        record
            .label_bits_iter()
            .filter_map(|bit| id_to_label.get(bit as usize).cloned())
            .collect()
    }

    fn vertex_property(&self, vertex: VertexId, key: &PropertyKey) -> Option<Value> {
        self.vertex_properties.get(vertex, key)
    }

    fn structure_version(&self) -> u64 {
        self.structure_version.load(Ordering::Acquire)
    }
}
