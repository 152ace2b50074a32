//! Chunked adjacency lists with delta buffers.
//!
//! Stores, per vertex, the `(neighbor, edge)` pairs of one direction. The
//! store keeps one instance for outgoing and one for incoming edges.
//!
//! - O(1) amortized edge insertion
//! - Iteration in insertion order, which keeps traversals deterministic
//! - Tombstone deletion, reclaimed on compaction

use greql_common::types::{EdgeId, VertexId};
use greql_common::utils::hash::{FxHashMap, FxHashSet};
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default chunk capacity (number of edges per chunk).
const DEFAULT_CHUNK_CAPACITY: usize = 64;

/// Threshold for delta buffer compaction.
const DELTA_COMPACTION_THRESHOLD: usize = 1024;

/// A chunk of adjacency entries.
#[derive(Debug, Clone)]
struct AdjacencyChunk {
    neighbors: Vec<VertexId>,
    /// Parallel to `neighbors`.
    edge_ids: Vec<EdgeId>,
    capacity: usize,
}

impl AdjacencyChunk {
    fn new(capacity: usize) -> Self {
        Self {
            neighbors: Vec::with_capacity(capacity),
            edge_ids: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    fn is_full(&self) -> bool {
        self.neighbors.len() >= self.capacity
    }

    fn push(&mut self, neighbor: VertexId, edge_id: EdgeId) -> bool {
        if self.is_full() {
            return false;
        }
        self.neighbors.push(neighbor);
        self.edge_ids.push(edge_id);
        true
    }

    fn iter(&self) -> impl Iterator<Item = (VertexId, EdgeId)> + '_ {
        self.neighbors
            .iter()
            .copied()
            .zip(self.edge_ids.iter().copied())
    }
}

/// Adjacency list for a single vertex.
#[derive(Debug)]
struct AdjacencyList {
    chunks: Vec<AdjacencyChunk>,
    /// Recent insertions not yet moved into chunks.
    delta_inserts: SmallVec<[(VertexId, EdgeId); 8]>,
    deleted: FxHashSet<EdgeId>,
}

impl AdjacencyList {
    fn new() -> Self {
        Self {
            chunks: Vec::new(),
            delta_inserts: SmallVec::new(),
            deleted: FxHashSet::default(),
        }
    }

    fn add_edge(&mut self, neighbor: VertexId, edge_id: EdgeId) {
        if let Some(last) = self.chunks.last_mut() {
            if last.push(neighbor, edge_id) {
                return;
            }
        }
        self.delta_inserts.push((neighbor, edge_id));
    }

    fn mark_deleted(&mut self, edge_id: EdgeId) -> bool {
        self.deleted.insert(edge_id)
    }

    /// Moves the delta buffer into chunks and drops tombstoned entries.
    fn compact(&mut self, chunk_capacity: usize) {
        if self.delta_inserts.is_empty() && self.deleted.is_empty() {
            return;
        }

        let live: Vec<(VertexId, EdgeId)> = self.iter().collect();
        self.chunks.clear();
        self.delta_inserts.clear();
        self.deleted.clear();

        let mut current = AdjacencyChunk::new(chunk_capacity);
        for (neighbor, edge_id) in live {
            if !current.push(neighbor, edge_id) {
                self.chunks.push(current);
                current = AdjacencyChunk::new(chunk_capacity);
                current.push(neighbor, edge_id);
            }
        }
        if !current.is_empty() {
            self.chunks.push(current);
        }
    }

    fn iter(&self) -> impl Iterator<Item = (VertexId, EdgeId)> + '_ {
        let deleted = &self.deleted;

        self.chunks
            .iter()
            .flat_map(AdjacencyChunk::iter)
            .chain(self.delta_inserts.iter().copied())
            .filter(move |(_, edge_id)| !deleted.contains(edge_id))
    }

    fn degree(&self) -> usize {
        self.iter().count()
    }
}

/// Chunked adjacency lists for one edge direction.
///
/// Supports insertion, deletion via tombstones, and ordered scans.
pub struct ChunkedAdjacency {
    /// Adjacency lists indexed by vertex.
    lists: RwLock<FxHashMap<VertexId, AdjacencyList>>,
    chunk_capacity: usize,
    /// Total number of edges inserted (including deleted).
    edge_count: AtomicUsize,
    /// Number of tombstoned edges.
    deleted_count: AtomicUsize,
}

impl ChunkedAdjacency {
    /// Creates a new chunked adjacency structure.
    #[must_use]
    pub fn new() -> Self {
        Self::with_chunk_capacity(DEFAULT_CHUNK_CAPACITY)
    }

    /// Creates a new chunked adjacency with custom chunk capacity.
    #[must_use]
    pub fn with_chunk_capacity(capacity: usize) -> Self {
        Self {
            lists: RwLock::new(FxHashMap::default()),
            chunk_capacity: capacity.max(1),
            edge_count: AtomicUsize::new(0),
            deleted_count: AtomicUsize::new(0),
        }
    }

    /// Records `edge_id` from `vertex` to `neighbor`.
    pub fn add_edge(&self, vertex: VertexId, neighbor: VertexId, edge_id: EdgeId) {
        let mut lists = self.lists.write();
        let list = lists.entry(vertex).or_insert_with(AdjacencyList::new);
        list.add_edge(neighbor, edge_id);
        if list.delta_inserts.len() >= DELTA_COMPACTION_THRESHOLD {
            list.compact(self.chunk_capacity);
        }
        self.edge_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Marks an edge of `vertex` as deleted.
    pub fn mark_deleted(&self, vertex: VertexId, edge_id: EdgeId) {
        let mut lists = self.lists.write();
        if let Some(list) = lists.get_mut(&vertex) {
            if list.mark_deleted(edge_id) {
                self.deleted_count.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Returns the neighbors of `vertex` in insertion order.
    pub fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> {
        self.edges_from(vertex).map(|(neighbor, _)| neighbor)
    }

    /// Returns the `(neighbor, edge)` pairs of `vertex` in insertion order.
    ///
    /// The pairs are copied out so the lock is not held by the caller.
    pub fn edges_from(&self, vertex: VertexId) -> impl Iterator<Item = (VertexId, EdgeId)> {
        let lists = self.lists.read();
        let edges: Vec<(VertexId, EdgeId)> = lists
            .get(&vertex)
            .map(|list| list.iter().collect())
            .unwrap_or_default();
        edges.into_iter()
    }

    /// Returns the number of live edges of `vertex`.
    pub fn degree(&self, vertex: VertexId) -> usize {
        let lists = self.lists.read();
        lists.get(&vertex).map_or(0, AdjacencyList::degree)
    }

    /// Compacts all adjacency lists, dropping tombstones.
    pub fn compact(&self) {
        let mut lists = self.lists.write();
        let mut reclaimed = 0;
        for list in lists.values_mut() {
            reclaimed += list.deleted.len();
            list.compact(self.chunk_capacity);
        }
        self.edge_count.fetch_sub(reclaimed, Ordering::Relaxed);
        self.deleted_count.fetch_sub(reclaimed, Ordering::Relaxed);
    }

    /// Returns the total number of edges (including tombstoned ones).
    pub fn total_edge_count(&self) -> usize {
        self.edge_count.load(Ordering::Relaxed)
    }

    /// Returns the number of live edges.
    pub fn active_edge_count(&self) -> usize {
        self.edge_count.load(Ordering::Relaxed) - self.deleted_count.load(Ordering::Relaxed)
    }
}

impl Default for ChunkedAdjacency {
    fn default() -> Self {
        Self::new()
    }
}
