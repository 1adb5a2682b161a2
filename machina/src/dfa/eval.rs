use crate::dfa::{Dfa, DfaState};

/// A struct keeping track of the current state during the evaluation of a
/// string on a DFA. Once a letter outside the alphabet or an undefined
/// transition is seen, the evaluator is dead and stays dead.
#[derive(Debug, Clone)]
pub struct DfaEvaluator<'a> {
    dfa: &'a Dfa,
    current: Option<usize>,
}

impl<'a> DfaEvaluator<'a> {
    pub(crate) fn new(dfa: &'a Dfa, initial: usize) -> Self {
        Self {
            dfa,
            current: Some(initial),
        }
    }

    /// Checks if the evaluator is currently in an accepting state
    pub fn is_accepting(&self) -> bool {
        self.current_state().map_or(false, DfaState::is_accepting)
    }

    /// Gets the current state, unless the evaluator is dead
    pub fn current_state(&self) -> Option<&'a DfaState> {
        self.current.map(|idx| &self.dfa.states[idx])
    }

    /// Gets the index of the current state, unless the evaluator is dead
    pub fn current_state_index(&self) -> Option<usize> {
        self.current
    }

    /// Steps on one letter, returning the new state. The evaluator dies
    /// on letters outside the alphabet and on undefined transitions.
    pub fn step(&mut self, letter: char) -> Option<&'a DfaState> {
        let state = self.current?;
        self.current = self
            .dfa
            .letter_idx(letter)
            .and_then(|idx| self.dfa.states[state].transitions[idx]);
        self.current_state()
    }

    /// Steps once per letter, as [DfaEvaluator::step]
    pub fn step_multiple(&mut self, letters: impl IntoIterator<Item = char>) {
        for letter in letters {
            if self.step(letter).is_none() {
                return;
            }
        }
    }
}

impl<'a> From<&'a Dfa> for DfaEvaluator<'a> {
    fn from(value: &'a Dfa) -> Self {
        Self {
            dfa: value,
            current: value.initial,
        }
    }
}
