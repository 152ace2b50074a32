//! Visited markers for automaton-driven traversal.
//!
//! A search visits `(vertex, state)` pairs, so the store holds one map per
//! automaton state. What a marker carries depends on the search:
//!
//! | Search | Marker |
//! |--------|--------|
//! | reachability, reachable set | `()` |
//! | path system | [`MarkerEntry`] (first discovery only) |
//! | slice | [`MarkerList`] (every distinct parent link) |
//!
//! Stores are created per call and dropped with it.

use crate::automaton::StateId;
use greql_common::types::{EdgeId, VertexId};
use greql_common::utils::hash::FxHashMap;
use indexmap::IndexMap;

/// Discovery record of a `(vertex, state)` pair.
///
/// Entries link backwards: the parent fields name the pair the traversal came
/// from, and `edge_to_parent` the edge it crossed (`None` for free
/// transitions and for roots).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerEntry {
    /// The vertex.
    pub vertex: VertexId,
    /// The automaton state.
    pub state: StateId,
    /// Vertex of the parent pair.
    pub parent_vertex: Option<VertexId>,
    /// State of the parent pair.
    pub parent_state: Option<StateId>,
    /// Edge crossed from the parent.
    pub edge_to_parent: Option<EdgeId>,
    /// Number of edges crossed since the root.
    pub distance: u32,
}

impl MarkerEntry {
    /// Creates the entry of a search root.
    #[must_use]
    pub const fn root(vertex: VertexId, state: StateId) -> Self {
        Self {
            vertex,
            state,
            parent_vertex: None,
            parent_state: None,
            edge_to_parent: None,
            distance: 0,
        }
    }

    /// Creates the entry of a pair reached from `parent`.
    ///
    /// Distance grows by one only when an edge was crossed.
    #[must_use]
    pub fn child(vertex: VertexId, state: StateId, parent: &MarkerEntry, edge: Option<EdgeId>) -> Self {
        Self {
            vertex,
            state,
            parent_vertex: Some(parent.vertex),
            parent_state: Some(parent.state),
            edge_to_parent: edge,
            distance: parent.distance + u32::from(edge.is_some()),
        }
    }

    /// Returns `true` for root entries.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_vertex.is_none()
    }

    /// Returns the `(vertex, state)` key.
    #[inline]
    #[must_use]
    pub fn key(&self) -> (VertexId, StateId) {
        (self.vertex, self.state)
    }

    /// Returns the key of the parent pair.
    #[must_use]
    pub fn parent_key(&self) -> Option<(VertexId, StateId)> {
        self.parent_vertex.zip(self.parent_state)
    }

    /// Returns the link this entry was recorded under.
    #[must_use]
    pub fn link(&self) -> ParentKey {
        match self.parent_key() {
            Some((vertex, state)) => ParentKey::Link {
                vertex,
                state,
                edge: self.edge_to_parent,
            },
            None => ParentKey::Root,
        }
    }
}

/// Identifies how a pair was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentKey {
    /// Seeded as a root.
    Root,
    /// Reached from `(vertex, state)`, over `edge` if one was crossed.
    Link {
        /// Parent vertex.
        vertex: VertexId,
        /// Parent state.
        state: StateId,
        /// Crossed edge.
        edge: Option<EdgeId>,
    },
}

/// All parent links of one `(vertex, state)` pair, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct MarkerList {
    entries: IndexMap<ParentKey, MarkerEntry>,
}

impl MarkerList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `entry` under its link. Returns `false` if the link was
    /// already present; the earlier entry is kept.
    pub fn insert(&mut self, entry: MarkerEntry) -> bool {
        let key = entry.link();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, entry);
        true
    }

    /// Returns the entry recorded first.
    #[must_use]
    pub fn first(&self) -> Option<&MarkerEntry> {
        self.entries.first().map(|(_, e)| e)
    }

    /// Returns `true` if `key` was recorded.
    #[must_use]
    pub fn contains(&self, key: &ParentKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over the entries in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &MarkerEntry> {
        self.entries.values()
    }

    /// Returns the smallest distance of any entry.
    #[must_use]
    pub fn min_distance(&self) -> Option<u32> {
        self.entries.values().map(|e| e.distance).min()
    }

    /// Returns the number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no link was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-state visited markers.
#[derive(Debug, Clone)]
pub struct MarkerStore<M> {
    maps: Vec<FxHashMap<VertexId, M>>,
    len: usize,
}

impl<M> MarkerStore<M> {
    /// Creates a store for an automaton with `state_count` states.
    #[must_use]
    pub fn new(state_count: usize) -> Self {
        let mut maps = Vec::with_capacity(state_count);
        maps.resize_with(state_count, FxHashMap::default);
        Self { maps, len: 0 }
    }

    /// Returns the number of state slots.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.maps.len()
    }

    /// Returns `true` if `(vertex, state)` carries a marker.
    #[inline]
    #[must_use]
    pub fn is_marked(&self, vertex: VertexId, state: StateId) -> bool {
        self.maps
            .get(state.index())
            .is_some_and(|m| m.contains_key(&vertex))
    }

    /// Returns the marker of `(vertex, state)`.
    #[inline]
    #[must_use]
    pub fn get(&self, vertex: VertexId, state: StateId) -> Option<&M> {
        self.maps.get(state.index())?.get(&vertex)
    }

    /// Marks `(vertex, state)` with `marker` unless it is marked already.
    ///
    /// Returns `true` if the pair was newly marked. Existing markers are
    /// never overwritten, and states outside the store are ignored.
    pub fn mark_with(&mut self, vertex: VertexId, state: StateId, marker: M) -> bool {
        let Some(map) = self.maps.get_mut(state.index()) else {
            return false;
        };
        if map.contains_key(&vertex) {
            return false;
        }
        map.insert(vertex, marker);
        self.len += 1;
        true
    }

    /// Returns the total number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing is marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over the markers of one state.
    pub fn iter_state(&self, state: StateId) -> impl Iterator<Item = (VertexId, &M)> {
        self.maps
            .get(state.index())
            .into_iter()
            .flat_map(|m| m.iter().map(|(&v, marker)| (v, marker)))
    }
}

impl MarkerStore<()> {
    /// Marks `(vertex, state)`. Returns `true` if it was not marked before.
    #[inline]
    pub fn mark(&mut self, vertex: VertexId, state: StateId) -> bool {
        self.mark_with(vertex, state, ())
    }
}

impl MarkerStore<MarkerList> {
    /// Records `entry` as a parent link of its pair.
    ///
    /// Returns `true` if this `(vertex, state, parent link)` combination is
    /// new. [`len`](Self::len) counts pairs, not links.
    pub fn mark_entry(&mut self, entry: MarkerEntry) -> bool {
        let Some(map) = self.maps.get_mut(entry.state.index()) else {
            return false;
        };
        let list = map.entry(entry.vertex).or_insert_with(|| {
            self.len += 1;
            MarkerList::new()
        });
        list.insert(entry)
    }

    /// Returns `true` if `(vertex, state)` was reached through `key`.
    #[must_use]
    pub fn is_marked_with_parent(&self, vertex: VertexId, state: StateId, key: &ParentKey) -> bool {
        self.get(vertex, state).is_some_and(|list| list.contains(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: u64) -> VertexId {
        VertexId::new(i)
    }

    fn s(i: u32) -> StateId {
        StateId::new(i)
    }

    #[test]
    fn test_unit_markers() {
        let mut store = MarkerStore::new(2);
        assert!(store.mark(v(1), s(0)));
        assert!(!store.mark(v(1), s(0)));
        assert!(store.mark(v(1), s(1)));
        assert!(!store.mark(v(1), s(7)));

        assert!(store.is_marked(v(1), s(0)));
        assert!(!store.is_marked(v(2), s(0)));
        assert!(!store.is_marked(v(1), s(7)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_entry_markers_never_overwrite() {
        let mut store = MarkerStore::new(1);
        let root = MarkerEntry::root(v(0), s(0));
        let first = MarkerEntry::child(v(1), s(0), &root, Some(EdgeId::new(0)));
        let second = MarkerEntry::child(v(1), s(0), &root, Some(EdgeId::new(1)));

        assert!(store.mark_with(v(1), s(0), first));
        assert!(!store.mark_with(v(1), s(0), second));
        assert_eq!(store.get(v(1), s(0)), Some(&first));
        assert_eq!(first.distance, 1);
        assert_eq!(first.parent_key(), Some((v(0), s(0))));
    }

    #[test]
    fn test_free_transition_keeps_distance() {
        let root = MarkerEntry::root(v(0), s(0));
        let free = MarkerEntry::child(v(0), s(1), &root, None);
        assert_eq!(free.distance, 0);
        assert!(!free.is_root());
        assert_eq!(
            free.link(),
            ParentKey::Link {
                vertex: v(0),
                state: s(0),
                edge: None
            }
        );
    }

    #[test]
    fn test_marker_lists() {
        let mut store: MarkerStore<MarkerList> = MarkerStore::new(1);
        let r1 = MarkerEntry::root(v(1), s(0));
        let r2 = MarkerEntry::root(v(2), s(0));
        let from_r1 = MarkerEntry::child(v(9), s(0), &r1, Some(EdgeId::new(0)));
        let from_r2 = MarkerEntry::child(v(9), s(0), &r2, Some(EdgeId::new(1)));

        assert!(store.mark_entry(r1));
        assert!(store.mark_entry(from_r1));
        assert!(!store.mark_entry(from_r1));
        assert!(store.mark_entry(from_r2));

        assert_eq!(store.len(), 2);
        let list = store.get(v(9), s(0)).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.first(), Some(&from_r1));
        assert!(store.is_marked_with_parent(v(9), s(0), &from_r2.link()));
        assert!(store.is_marked_with_parent(v(1), s(0), &ParentKey::Root));
        assert!(!store.is_marked_with_parent(v(2), s(0), &ParentKey::Root));
    }

    #[test]
    fn test_parallel_edges_are_distinct_links() {
        let mut list = MarkerList::new();
        let root = MarkerEntry::root(v(0), s(0));
        assert!(list.insert(MarkerEntry::child(v(1), s(1), &root, Some(EdgeId::new(0)))));
        assert!(list.insert(MarkerEntry::child(v(1), s(1), &root, Some(EdgeId::new(1)))));
        assert_eq!(list.len(), 2);
        assert_eq!(list.min_distance(), Some(1));
    }

    mod props {
        use super::*;
        use greql_common::utils::hash::FxHashSet;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_first_mark_wins(marks in prop::collection::vec((0u64..16, 0u32..4, 0u32..100), 0..64)) {
                let mut store: MarkerStore<u32> = MarkerStore::new(4);
                let mut seen = FxHashSet::default();
                let mut first = Vec::new();
                for &(vertex, state, tag) in &marks {
                    let fresh = seen.insert((vertex, state));
                    prop_assert_eq!(store.mark_with(v(vertex), s(state), tag), fresh);
                    if fresh {
                        first.push((vertex, state, tag));
                    }
                }
                prop_assert_eq!(store.len(), seen.len());
                for (vertex, state, tag) in first {
                    prop_assert_eq!(store.get(v(vertex), s(state)), Some(&tag));
                }
            }
        }
    }
}
