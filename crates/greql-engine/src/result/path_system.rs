//! Path systems: all matching paths from one root, as a tree.

use greql_common::types::{EdgeId, VertexId};
use greql_common::utils::hash::FxHashSet;
use greql_core::automaton::{Automaton, StateId};
use greql_core::marker::{MarkerEntry, MarkerStore};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use smallvec::SmallVec;

use super::path::Path;

/// One `(vertex, state)` entry of a path system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathSystemEntry {
    /// Automaton state.
    pub state: StateId,
    /// Vertex of the parent entry, `None` at the root.
    pub parent_vertex: Option<VertexId>,
    /// State of the parent entry.
    pub parent_state: Option<StateId>,
    /// Edge crossed from the parent, `None` for free transitions.
    pub edge_to_parent: Option<EdgeId>,
    /// Edges crossed since the root.
    pub distance: u32,
    /// Whether `state` is final.
    pub is_final: bool,
}

impl PathSystemEntry {
    fn parent_key(&self) -> Option<(VertexId, StateId)> {
        self.parent_vertex.zip(self.parent_state)
    }
}

/// Every path from a root vertex accepted by an automaton.
///
/// A vertex can appear under several states; each `(vertex, state)` entry
/// has exactly one parent, and following parents always ends at the root.
/// Vertex-level queries look at the vertex's primary entry: the one with the
/// smallest distance, the earliest one on ties.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSystem {
    root: VertexId,
    root_state: StateId,
    entries: IndexMap<(VertexId, StateId), PathSystemEntry>,
    by_vertex: IndexMap<VertexId, SmallVec<[StateId; 2]>>,
    leaf_keys: Vec<(VertexId, StateId)>,
    edges: IndexSet<EdgeId>,
}

impl PathSystem {
    /// Builds a path system from search markers.
    ///
    /// `leaves` are the final entries in discovery order. Each is walked back
    /// to the root; a walk stops at the first entry already in the system.
    pub(crate) fn from_markers(
        root: VertexId,
        automaton: &Automaton,
        markers: &MarkerStore<MarkerEntry>,
        leaves: &[(VertexId, StateId)],
    ) -> Self {
        let mut system = Self {
            root,
            root_state: automaton.initial_state(),
            entries: IndexMap::new(),
            by_vertex: IndexMap::new(),
            leaf_keys: Vec::with_capacity(leaves.len()),
            edges: IndexSet::new(),
        };

        for &(vertex, state) in leaves {
            system.leaf_keys.push((vertex, state));
            let mut cursor = markers.get(vertex, state);
            while let Some(marker) = cursor {
                if system.entries.contains_key(&marker.key()) {
                    break;
                }
                system.insert(marker, automaton.is_final(marker.state));
                cursor = marker
                    .parent_key()
                    .and_then(|(pv, ps)| markers.get(pv, ps));
            }
        }

        system
    }

    fn insert(&mut self, marker: &MarkerEntry, is_final: bool) {
        self.entries.insert(
            marker.key(),
            PathSystemEntry {
                state: marker.state,
                parent_vertex: marker.parent_vertex,
                parent_state: marker.parent_state,
                edge_to_parent: marker.edge_to_parent,
                distance: marker.distance,
                is_final,
            },
        );
        self.by_vertex
            .entry(marker.vertex)
            .or_default()
            .push(marker.state);
        if let Some(edge) = marker.edge_to_parent {
            self.edges.insert(edge);
        }
    }

    /// Returns the root vertex.
    #[must_use]
    pub fn root_vertex(&self) -> VertexId {
        self.root
    }

    /// Returns the automaton state of the root entry.
    #[must_use]
    pub fn root_state(&self) -> StateId {
        self.root_state
    }

    /// Returns `true` if no path matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the vertices of the system.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.by_vertex.keys().copied()
    }

    /// Iterates over the edges of the system.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().copied()
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.by_vertex.len()
    }

    /// Returns the number of vertices (GReQL `weight`).
    #[must_use]
    pub fn weight(&self) -> usize {
        self.vertex_count()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the number of `(vertex, state)` entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if `vertex` lies on a matching path.
    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.by_vertex.contains_key(&vertex)
    }

    /// Returns `true` if `edge` lies on a matching path.
    #[must_use]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }

    /// Iterates over the entries of `vertex`.
    pub fn entries(&self, vertex: VertexId) -> impl Iterator<Item = &PathSystemEntry> + '_ {
        self.by_vertex
            .get(&vertex)
            .into_iter()
            .flatten()
            .filter_map(move |&state| self.entries.get(&(vertex, state)))
    }

    /// Returns the entry of `(vertex, state)`.
    #[must_use]
    pub fn entry(&self, vertex: VertexId, state: StateId) -> Option<&PathSystemEntry> {
        self.entries.get(&(vertex, state))
    }

    fn primary_entry(&self, vertex: VertexId) -> Option<&PathSystemEntry> {
        self.entries(vertex).min_by_key(|e| e.distance)
    }

    /// Iterates over the vertices that end a matching path.
    pub fn leaves(&self) -> impl Iterator<Item = VertexId> + '_ {
        let mut seen = FxHashSet::default();
        self.leaf_keys
            .iter()
            .map(|&(v, _)| v)
            .filter(move |v| seen.insert(*v))
    }

    /// Returns `true` if `vertex` ends a matching path.
    #[must_use]
    pub fn is_leaf(&self, vertex: VertexId) -> bool {
        self.entries(vertex).any(|e| e.is_final)
    }

    /// Returns the vertices that are the parent of another vertex over an
    /// edge, in entry order.
    #[must_use]
    pub fn inner_nodes(&self) -> IndexSet<VertexId> {
        self.entries
            .values()
            .filter(|e| e.edge_to_parent.is_some())
            .filter_map(|e| e.parent_vertex)
            .collect()
    }

    /// Returns the vertices whose entries hang off `vertex` over an edge.
    #[must_use]
    pub fn children(&self, vertex: VertexId) -> IndexSet<VertexId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.edge_to_parent.is_some() && e.parent_vertex == Some(vertex))
            .map(|(&(child, _), _)| child)
            .collect()
    }

    /// Follows free transitions up from the primary entry of `vertex` to the
    /// first entry reached over an edge.
    fn edge_link(&self, vertex: VertexId) -> Option<&PathSystemEntry> {
        let mut entry = self.primary_entry(vertex)?;
        loop {
            if entry.edge_to_parent.is_some() {
                return Some(entry);
            }
            entry = self.entries.get(&entry.parent_key()?)?;
        }
    }

    /// Returns the tree parent of `vertex`, skipping free transitions.
    #[must_use]
    pub fn parent_vertex(&self, vertex: VertexId) -> Option<VertexId> {
        self.edge_link(vertex)?.parent_vertex
    }

    /// Returns the edge leading to `vertex` from its tree parent.
    #[must_use]
    pub fn edge_to_parent(&self, vertex: VertexId) -> Option<EdgeId> {
        self.edge_link(vertex)?.edge_to_parent
    }

    /// Returns the smallest distance of `vertex` from the root.
    #[must_use]
    pub fn distance(&self, vertex: VertexId) -> Option<u32> {
        self.entries(vertex).map(|e| e.distance).min()
    }

    /// Returns the number of system edges incident to `vertex`.
    #[must_use]
    pub fn degree(&self, vertex: VertexId) -> usize {
        let incident: FxHashSet<EdgeId> = self
            .entries
            .iter()
            .filter(|&(&(child, _), e)| child == vertex || e.parent_vertex == Some(vertex))
            .filter_map(|(_, e)| e.edge_to_parent)
            .collect();
        incident.len()
    }

    /// Returns the largest distance of any entry.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.entries.values().map(|e| e.distance).max().unwrap_or(0)
    }

    fn path_to(&self, vertex: VertexId, state: StateId) -> Path {
        let mut steps: Vec<(EdgeId, VertexId)> = Vec::new();
        let mut key = (vertex, state);
        while let Some(entry) = self.entries.get(&key) {
            if let Some(edge) = entry.edge_to_parent {
                steps.push((edge, key.0));
            }
            match entry.parent_key() {
                Some(parent) => key = parent,
                None => break,
            }
        }

        let mut path = Path::new(self.root);
        for (edge, v) in steps.into_iter().rev() {
            path.append(edge, v);
        }
        path
    }

    /// Returns the path from the root to `vertex`.
    ///
    /// Uses a final entry of `vertex` if there is one, the closest first.
    #[must_use]
    pub fn extract_path(&self, vertex: VertexId) -> Option<Path> {
        let best = self
            .entries(vertex)
            .min_by_key(|e| (!e.is_final, e.distance))?;
        Some(self.path_to(vertex, best.state))
    }

    /// Returns one path per leaf entry, without duplicates.
    #[must_use]
    pub fn extract_paths(&self) -> Vec<Path> {
        let paths: IndexSet<Path> = self
            .leaf_keys
            .iter()
            .map(|&(v, s)| self.path_to(v, s))
            .collect();
        paths.into_iter().collect()
    }

    /// Returns the extracted paths with exactly `length` edges.
    #[must_use]
    pub fn extract_paths_of_length(&self, length: usize) -> Vec<Path> {
        self.extract_paths()
            .into_iter()
            .filter(|p| p.length() == length)
            .collect()
    }
}
