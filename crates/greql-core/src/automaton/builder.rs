//! Programmatic automaton construction.

use super::{Automaton, AutomatonError, State, StateId, Transition, TransitionKind};

/// Incrementally builds an [`Automaton`].
///
/// States get consecutive ids in the order they are added. The initial
/// state defaults to the first one.
///
/// # Example
///
/// ```
/// use greql_core::automaton::{AutomatonBuilder, TransitionKind, TypeFilter};
/// use greql_core::graph::Direction;
///
/// let mut builder = AutomatonBuilder::new();
/// let start = builder.add_state(false);
/// let end = builder.add_state(true);
/// builder.add_transition(start, end, TransitionKind::Edge {
///     direction: Direction::Outgoing,
///     edge_types: TypeFilter::Any,
/// });
/// let automaton = builder.build().unwrap();
/// assert_eq!(automaton.state_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct AutomatonBuilder {
    finals: Vec<bool>,
    transitions: Vec<(StateId, Transition)>,
    initial: Option<StateId>,
}

impl AutomatonBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state and returns its id.
    pub fn add_state(&mut self, is_final: bool) -> StateId {
        let id = StateId::new(self.finals.len() as u32);
        self.finals.push(is_final);
        id
    }

    /// Adds a transition from `from` to `to`.
    ///
    /// Unknown states are reported by [`build`](Self::build).
    pub fn add_transition(&mut self, from: StateId, to: StateId, kind: TransitionKind) -> &mut Self {
        self.transitions.push((from, Transition::new(to, kind)));
        self
    }

    /// Sets the initial state.
    pub fn set_initial(&mut self, state: StateId) -> &mut Self {
        self.initial = Some(state);
        self
    }

    /// Validates and builds the automaton.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::UnknownState`] for a transition leaving a
    /// state that was never added, and every error of [`Automaton::new`].
    pub fn build(self) -> Result<Automaton, AutomatonError> {
        let mut per_state: Vec<Vec<Transition>> = vec![Vec::new(); self.finals.len()];
        for (from, transition) in self.transitions {
            per_state
                .get_mut(from.index())
                .ok_or(AutomatonError::UnknownState(from))?
                .push(transition);
        }

        let states = self
            .finals
            .into_iter()
            .zip(per_state)
            .enumerate()
            .map(|(i, (is_final, transitions))| State::new(StateId::new(i as u32), is_final, transitions))
            .collect();

        Automaton::new(states, self.initial.unwrap_or_default())
    }
}
