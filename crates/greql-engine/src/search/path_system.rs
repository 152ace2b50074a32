//! Path-system construction.

use std::collections::VecDeque;

use greql_common::types::VertexId;
use greql_core::graph::GraphAccess;
use greql_core::marker::{MarkerEntry, MarkerStore};

use super::PathSearch;
use crate::error::Result;
use crate::result::PathSystem;

impl<G: GraphAccess + ?Sized> PathSearch<'_, G> {
    /// Builds the path system of every accepted path starting at `root`.
    ///
    /// Each `(vertex, state)` pair keeps the parent it was first discovered
    /// from, so the result is a tree even when the graph has cycles.
    ///
    /// # Errors
    ///
    /// `UnknownVertex` if `root` is missing, plus budget and
    /// concurrent-mutation failures.
    pub fn path_system(&self, root: VertexId) -> Result<PathSystem> {
        self.require_vertex("root", root)?;
        let guard = self.guard()?;

        let initial = self.automaton.initial_state();
        let mut markers: MarkerStore<MarkerEntry> = MarkerStore::new(self.automaton.state_count());
        let mut queue = VecDeque::new();
        let root_entry = MarkerEntry::root(root, initial);
        markers.mark_with(root, initial, root_entry);
        queue.push_back(root_entry);

        let mut leaves = Vec::new();
        let mut steps = Vec::new();
        while let Some(entry) = queue.pop_front() {
            guard.check(self.graph, queue.len(), markers.len())?;

            if self.automaton.is_final(entry.state) {
                leaves.push(entry.key());
            }

            self.expand(entry.vertex, entry.state, &mut steps);
            for step in &steps {
                let child = MarkerEntry::child(step.next_vertex, step.end_state, &entry, step.edge);
                if markers.mark_with(child.vertex, child.state, child) {
                    tracing::trace!(
                        vertex = %child.vertex,
                        state = %child.state,
                        distance = child.distance,
                        "discovered"
                    );
                    queue.push_back(child);
                }
            }
        }

        let system = PathSystem::from_markers(root, self.automaton, &markers, &leaves);
        tracing::debug!(
            %root,
            markers = markers.len(),
            vertices = system.vertex_count(),
            leaves = leaves.len(),
            "path system built"
        );
        Ok(system)
    }
}
