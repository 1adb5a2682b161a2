use crate::nfa::{Nfa, NfaState};
use std::collections::HashSet;

/// A struct keeping track of the set of current states during the
/// evaluation of a string on an NFA. The set is kept ε-closed at all
/// times; it becomes (and stays) empty once no transition applies.
#[derive(Debug, Clone)]
pub struct NfaEvaluator<'a> {
    nfa: &'a Nfa,
    current: HashSet<usize>,
}

impl<'a> NfaEvaluator<'a> {
    pub(crate) fn new(nfa: &'a Nfa, initial: usize) -> Self {
        let mut current = HashSet::from([initial]);
        nfa.close_over_epsilon(&mut current);
        Self { nfa, current }
    }

    /// Checks if any of the current states is accepting
    pub fn is_accepting(&self) -> bool {
        self.current.iter().any(|&idx| self.nfa.states[idx].accepting)
    }

    /// Gets the current states
    pub fn current_states(&self) -> Vec<&'a NfaState> {
        self.current
            .iter()
            .map(|&idx| &self.nfa.states[idx])
            .collect()
    }

    /// Gets the indices of the current states
    pub fn current_states_idx(&self) -> &HashSet<usize> {
        &self.current
    }

    /// Steps on one letter: the new state set is the ε-closure of the
    /// union of all transitions on that letter from the current states.
    /// A letter outside the alphabet empties the set.
    pub fn step(&mut self, letter: char) {
        let Some(letter_idx) = self.nfa.letter_idx(letter) else {
            self.current.clear();
            return;
        };
        self.current = self
            .current
            .iter()
            .flat_map(|&state| self.nfa.states[state].transitions[letter_idx].iter().copied())
            .collect();
        self.nfa.close_over_epsilon(&mut self.current);
    }

    /// Steps one clone of this evaluator per letter of the alphabet,
    /// in the alphabet's ordering
    pub fn step_all(&self) -> Vec<NfaEvaluator<'a>> {
        self.nfa
            .alphabet
            .iter()
            .map(|&letter| {
                let mut eval = self.clone();
                eval.step(letter);
                eval
            })
            .collect()
    }
}
