//! Automaton construction errors.

use super::StateId;
use thiserror::Error;

/// Why an automaton was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// The automaton has no states.
    #[error("automaton has no states")]
    Empty,

    /// The initial state is not one of the automaton's states.
    #[error("initial state {initial} out of range ({count} states)")]
    InitialStateOutOfRange {
        /// The offending initial state.
        initial: StateId,
        /// Number of states.
        count: usize,
    },

    /// A state's id does not equal its position.
    #[error("state at position {position} has id {id}")]
    NonDenseStateId {
        /// Position in the state list.
        position: usize,
        /// The id found there.
        id: StateId,
    },

    /// A transition points at a state that does not exist.
    #[error("transition of {from} targets missing state {to}")]
    DanglingTransition {
        /// Source state.
        from: StateId,
        /// Missing end state.
        to: StateId,
    },

    /// A builder call named a state that was never added.
    #[error("unknown state {0}")]
    UnknownState(StateId),
}
