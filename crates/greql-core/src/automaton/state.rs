//! Automaton states.

use super::transition::Transition;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Dense 0-based identifier of an automaton state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(u32);

impl StateId {
    /// Creates a state id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the id as a slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl From<u32> for StateId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// A state: finality flag plus ordered outgoing transitions.
#[derive(Debug, Clone)]
pub struct State {
    id: StateId,
    is_final: bool,
    transitions: SmallVec<[Transition; 4]>,
    has_consuming: bool,
}

impl State {
    /// Creates a state.
    pub fn new(id: StateId, is_final: bool, transitions: impl IntoIterator<Item = Transition>) -> Self {
        let transitions: SmallVec<[Transition; 4]> = transitions.into_iter().collect();
        let has_consuming = transitions.iter().any(Transition::consumes_edge);
        Self {
            id,
            is_final,
            transitions,
            has_consuming,
        }
    }

    /// Returns the id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Returns `true` if reaching this state completes a match.
    #[inline]
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Returns the outgoing transitions in evaluation order.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns `true` if some transition consumes an edge.
    ///
    /// Traversals skip fetching incidences for states without one.
    #[inline]
    #[must_use]
    pub fn has_consuming_transitions(&self) -> bool {
        self.has_consuming
    }
}
