//! Evaluation errors.

use greql_common::types::VertexId;
use greql_core::automaton::AutomatonError;
use thiserror::Error;

/// Result type alias for evaluation.
pub type Result<T> = std::result::Result<T, EvaluationError>;

/// Errors raised while evaluating a path search or a library function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// The automaton failed validation.
    #[error("invalid automaton: {0}")]
    InvalidAutomaton(#[from] AutomatonError),

    /// A vertex argument is not in the graph.
    #[error("{argument} vertex {vertex} is not in the graph")]
    UnknownVertex {
        /// Which argument (`start`, `target`, `root`).
        argument: &'static str,
        /// The missing vertex.
        vertex: VertexId,
    },

    /// A path does not describe a walk in the graph.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The graph structure changed while a search was running.
    #[error("graph was modified during the search")]
    GraphModified,

    /// A search limit was hit.
    #[error("search budget exceeded: {0}")]
    BudgetExceeded(String),

    /// A slice was requested without root vertices.
    #[error("slicing criterion is empty")]
    EmptyCriterion,

    /// A configuration value was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No function is registered under the name.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// A function was called with the wrong number of arguments.
    #[error("{function} expects {expected} argument(s), got {actual}")]
    Arity {
        /// Function name.
        function: String,
        /// Accepted argument counts, e.g. `2` or `1..=2`.
        expected: String,
        /// Number of arguments given.
        actual: usize,
    },

    /// A function argument has the wrong type.
    #[error("{function}: argument {position} must be {expected}, got {actual}")]
    ArgumentType {
        /// Function name.
        function: String,
        /// 0-based argument position.
        position: usize,
        /// Expected type.
        expected: &'static str,
        /// Actual type.
        actual: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = EvaluationError::UnknownVertex {
            argument: "start",
            vertex: VertexId::new(3),
        };
        assert_eq!(err.to_string(), "start vertex v3 is not in the graph");

        let err: EvaluationError = AutomatonError::Empty.into();
        assert_eq!(err.to_string(), "invalid automaton: automaton has no states");
    }
}
