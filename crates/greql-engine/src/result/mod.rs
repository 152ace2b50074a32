//! Search results.
//!
//! - [`Path`] - a single walk
//! - [`PathSystem`] - all matching paths from one root, as a tree
//! - [`Slice`] - all matching paths from several roots, as a DAG
//!
//! Path systems and slices are built after the search from backward parent
//! links; paths are extracted from them on demand.

mod path;
mod path_system;
mod slice;

pub use path::Path;
pub use path_system::{PathSystem, PathSystemEntry};
pub use slice::{Slice, SliceNode, SliceParent};
