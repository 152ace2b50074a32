//! # greql-core
//!
//! Core layer for GReQL: the attributed graph store, the automaton model and
//! the marking store used by path search.
//!
//! This crate provides the data structures the search engine runs over. It
//! depends only on `greql-common`.
//!
//! ## Modules
//!
//! - [`graph`] - Graph model (LPG store), traversal interface, subgraphs
//! - [`index`] - Index structures (Chunked Adjacency)
//! - [`automaton`] - States, transitions and automata
//! - [`marker`] - Visited markers keyed by (vertex, state)

#![warn(missing_docs)]

pub mod automaton;
pub mod graph;
pub mod index;
pub mod marker;

// Re-export commonly used types
pub use automaton::{
    Automaton, AutomatonBuilder, AutomatonError, State, StateId, Step, Transition, TransitionKind,
    TypeFilter,
};
pub use graph::lpg::{Edge, LpgStore, LpgStoreConfig, Vertex};
pub use graph::subgraph::{Subgraph, SubgraphFilter};
pub use graph::{Direction, GraphAccess, Incidence};
pub use index::adjacency::ChunkedAdjacency;
pub use marker::{MarkerEntry, MarkerList, MarkerStore, ParentKey};
