//! Slices: all matching paths from a set of root vertices, as a DAG.

use greql_common::types::{EdgeId, VertexId};
use greql_common::utils::hash::FxHashSet;
use greql_core::automaton::{Automaton, StateId};
use greql_core::marker::{MarkerEntry, MarkerList, MarkerStore, ParentKey};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use smallvec::SmallVec;

use super::path::Path;

/// A recorded parent link of a slice node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SliceParent {
    /// Parent vertex.
    pub vertex: VertexId,
    /// Parent state.
    pub state: StateId,
    /// Edge crossed, `None` for free transitions.
    pub edge: Option<EdgeId>,
    /// Distance of the child when reached through this link.
    pub distance: u32,
}

/// One `(vertex, state)` node of a slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceNode {
    /// Vertex.
    pub vertex: VertexId,
    /// Automaton state.
    pub state: StateId,
    /// Whether the node was seeded from the slicing criterion.
    pub is_root: bool,
    /// Whether `state` is final.
    pub is_final: bool,
    /// Smallest distance over all links.
    pub distance: u32,
    /// Link the node was first discovered through. Following these always
    /// ends at a criterion vertex.
    pub discovery_parent: Option<SliceParent>,
    /// Every link, discovery order.
    pub parents: Vec<SliceParent>,
}

/// Every path starting at a criterion vertex accepted by an automaton.
///
/// Unlike a [`PathSystem`](super::PathSystem), a node keeps all the links it
/// was reached through, so shared suffixes and multiple roots are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    criterion: IndexSet<VertexId>,
    nodes: IndexMap<(VertexId, StateId), SliceNode>,
    by_vertex: IndexMap<VertexId, SmallVec<[StateId; 2]>>,
    edges: IndexSet<EdgeId>,
    leaves: IndexSet<VertexId>,
}

impl Slice {
    /// Builds a slice from search markers.
    ///
    /// Walks backwards from every final pair in `finals`, following all
    /// recorded links and visiting each pair once.
    pub(crate) fn from_markers(
        criterion: IndexSet<VertexId>,
        automaton: &Automaton,
        markers: &MarkerStore<MarkerList>,
        finals: &[(VertexId, StateId)],
    ) -> Self {
        let mut slice = Self {
            criterion,
            nodes: IndexMap::new(),
            by_vertex: IndexMap::new(),
            edges: IndexSet::new(),
            leaves: IndexSet::new(),
        };

        let mut visited: FxHashSet<(VertexId, StateId)> = FxHashSet::default();
        let mut stack: Vec<(VertexId, StateId)> = finals.iter().rev().copied().collect();
        while let Some((vertex, state)) = stack.pop() {
            if !visited.insert((vertex, state)) {
                continue;
            }
            let Some(list) = markers.get(vertex, state) else {
                continue;
            };

            let node = Self::node_from(vertex, state, automaton.is_final(state), list);
            for parent in node.parents.iter().rev() {
                if !visited.contains(&(parent.vertex, parent.state)) {
                    stack.push((parent.vertex, parent.state));
                }
            }
            slice.insert(node);
        }

        slice
    }

    fn node_from(vertex: VertexId, state: StateId, is_final: bool, list: &MarkerList) -> SliceNode {
        let links = |entry: &MarkerEntry| match entry.link() {
            ParentKey::Link { vertex, state, edge } => Some(SliceParent {
                vertex,
                state,
                edge,
                distance: entry.distance,
            }),
            ParentKey::Root => None,
        };

        SliceNode {
            vertex,
            state,
            is_root: list.contains(&ParentKey::Root),
            is_final,
            distance: list.min_distance().unwrap_or(0),
            discovery_parent: list.first().and_then(links),
            parents: list.iter().filter_map(links).collect(),
        }
    }

    fn insert(&mut self, node: SliceNode) {
        for parent in &node.parents {
            if let Some(edge) = parent.edge {
                self.edges.insert(edge);
            }
        }
        if node.is_final {
            self.leaves.insert(node.vertex);
        }
        self.by_vertex
            .entry(node.vertex)
            .or_default()
            .push(node.state);
        self.nodes.insert((node.vertex, node.state), node);
    }

    /// Returns the root vertices the slice was computed from.
    #[must_use]
    pub fn slicing_criterion(&self) -> &IndexSet<VertexId> {
        &self.criterion
    }

    /// Returns `true` if no path matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over the vertices of the slice.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.by_vertex.keys().copied()
    }

    /// Iterates over the edges of the slice.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().copied()
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.by_vertex.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the number of `(vertex, state)` nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
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

    /// Iterates over the nodes of `vertex`.
    pub fn nodes(&self, vertex: VertexId) -> impl Iterator<Item = &SliceNode> + '_ {
        self.by_vertex
            .get(&vertex)
            .into_iter()
            .flatten()
            .filter_map(move |&state| self.nodes.get(&(vertex, state)))
    }

    /// Returns the node of `(vertex, state)`.
    #[must_use]
    pub fn node(&self, vertex: VertexId, state: StateId) -> Option<&SliceNode> {
        self.nodes.get(&(vertex, state))
    }

    /// Iterates over the vertices that end a matching path.
    pub fn leaves(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.leaves.iter().copied()
    }

    /// Returns `true` if `vertex` ends a matching path.
    #[must_use]
    pub fn is_leaf(&self, vertex: VertexId) -> bool {
        self.leaves.contains(&vertex)
    }

    /// Returns the vertices that are the parent of a node over an edge.
    #[must_use]
    pub fn inner_nodes(&self) -> IndexSet<VertexId> {
        self.nodes
            .values()
            .flat_map(|n| n.parents.iter())
            .filter(|p| p.edge.is_some())
            .map(|p| p.vertex)
            .collect()
    }

    /// Returns the distinct `(parent vertex, edge)` links leading into
    /// `vertex`, looking through free transitions.
    #[must_use]
    pub fn parents(&self, vertex: VertexId) -> IndexSet<(VertexId, EdgeId)> {
        let mut result = IndexSet::new();
        let mut visited = FxHashSet::default();
        let mut stack: Vec<&SliceNode> = self.nodes(vertex).collect();
        stack.reverse();

        while let Some(node) = stack.pop() {
            if !visited.insert((node.vertex, node.state)) {
                continue;
            }
            for parent in &node.parents {
                match parent.edge {
                    Some(edge) => {
                        result.insert((parent.vertex, edge));
                    }
                    None => {
                        if let Some(up) = self.node(parent.vertex, parent.state) {
                            stack.push(up);
                        }
                    }
                }
            }
        }
        result
    }

    /// Returns the vertices reached from `vertex` over a slice edge.
    #[must_use]
    pub fn children(&self, vertex: VertexId) -> IndexSet<VertexId> {
        self.nodes
            .values()
            .filter(|n| {
                n.parents
                    .iter()
                    .any(|p| p.vertex == vertex && p.edge.is_some())
            })
            .map(|n| n.vertex)
            .collect()
    }

    /// Returns the smallest distance of `vertex` from a criterion vertex.
    #[must_use]
    pub fn distance(&self, vertex: VertexId) -> Option<u32> {
        self.nodes(vertex).map(|n| n.distance).min()
    }

    /// Returns the number of slice edges incident to `vertex`.
    #[must_use]
    pub fn degree(&self, vertex: VertexId) -> usize {
        let incident: FxHashSet<EdgeId> = self
            .nodes
            .values()
            .flat_map(|n| n.parents.iter().map(move |p| (n.vertex, p)))
            .filter(|(child, p)| *child == vertex || p.vertex == vertex)
            .filter_map(|(_, p)| p.edge)
            .collect();
        incident.len()
    }

    /// Returns every accepted path from a criterion vertex to `vertex`
    /// recorded in the slice.
    ///
    /// Walks start at the final nodes of `vertex` only. Paths never revisit a
    /// `(vertex, state)` node. A root node ends a path but the walk continues
    /// through its own links, so longer paths from other roots are found too.
    #[must_use]
    pub fn extract_paths(&self, vertex: VertexId) -> Vec<Path> {
        let mut found: IndexSet<Path> = IndexSet::new();
        let mut on_path: FxHashSet<(VertexId, StateId)> = FxHashSet::default();
        let mut steps: Vec<(EdgeId, VertexId)> = Vec::new();
        for node in self.nodes(vertex).filter(|n| n.is_final) {
            self.collect_paths(node, &mut on_path, &mut steps, &mut found);
        }
        found.into_iter().collect()
    }

    fn collect_paths(
        &self,
        node: &SliceNode,
        on_path: &mut FxHashSet<(VertexId, StateId)>,
        steps: &mut Vec<(EdgeId, VertexId)>,
        found: &mut IndexSet<Path>,
    ) {
        if !on_path.insert((node.vertex, node.state)) {
            return;
        }

        if node.is_root && self.criterion.contains(&node.vertex) {
            let mut path = Path::new(node.vertex);
            for &(edge, v) in steps.iter().rev() {
                path.append(edge, v);
            }
            found.insert(path);
        }

        for parent in &node.parents {
            let Some(up) = self.node(parent.vertex, parent.state) else {
                continue;
            };
            if let Some(edge) = parent.edge {
                steps.push((edge, node.vertex));
                self.collect_paths(up, on_path, steps, found);
                steps.pop();
            } else {
                self.collect_paths(up, on_path, steps, found);
            }
        }

        on_path.remove(&(node.vertex, node.state));
    }
}
