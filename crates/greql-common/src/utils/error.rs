//! Error types shared by the GReQL crates.

use crate::types::{EdgeId, VertexId};
use thiserror::Error;

/// Result type alias using the crate-wide [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the graph store and shared utilities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A vertex id does not name a live vertex.
    #[error("vertex not found: {0}")]
    VertexNotFound(VertexId),

    /// An edge id does not name a live edge.
    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// The store ran out of label slots.
    #[error("too many labels: at most {0} distinct labels are supported")]
    TooManyLabels(usize),

    /// A value was rejected.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Invariant violation inside GReQL.
    #[error("internal error: {0}")]
    Internal(String),
}
