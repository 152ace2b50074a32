//! Index structures for the graph store.
//!
//! - [`adjacency`] - Chunked adjacency lists backing incidence iteration

pub mod adjacency;

pub use adjacency::ChunkedAdjacency;
