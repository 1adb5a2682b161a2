//! # Nondeterministic Finite Automaton, with or without ε-moves
//! The NFA module includes the [Nfa] struct which represents a
//! [Nondeterministic finite automaton](https://en.wikipedia.org/wiki/Nondeterministic_finite_automaton)
//! with spontaneous (ε) transitions. NFAs are built through the builder
//! operations or produced by the [regex compiler](crate::regex::Regex);
//! the interesting operation on them is [lowering to a DFA](Nfa::to_dfa)
//! with the subset construction.
//!
//! ## Example
//! ```
//! use machina::label::Label;
//! use machina::nfa::Nfa;
//!
//! let mut nfa = Nfa::new();
//! nfa.set_alphabet(['0', '1']).unwrap();
//! nfa.add_states(["q0", "q1", "q2"]).unwrap();
//! nfa.set_initial("q0").unwrap();
//! nfa.set_accepting(["q2"]).unwrap();
//! nfa.add_transition("q0", '0', ["q1", "q2"]).unwrap();
//! nfa.add_transition("q0", '1', ["q0"]).unwrap();
//! nfa.add_transition("q0", Label::Epsilon, ["q2"]).unwrap();
//! nfa.add_transition("q1", '0', ["q1"]).unwrap();
//! nfa.add_transition("q1", '1', ["q2"]).unwrap();
//!
//! assert!(nfa.run("").unwrap());
//! assert!(nfa.run("11").unwrap());
//! assert!(!nfa.run("100").unwrap());
//! assert!(nfa.run("1001").unwrap());
//!
//! // The subset construction accepts the same language
//! let dfa = nfa.to_dfa().unwrap();
//! assert!(dfa.run("1001").unwrap());
//! assert!(!dfa.run("100").unwrap());
//! ```

use crate::dfa::{Dfa, DfaState};
use crate::label::Label;
pub use eval::NfaEvaluator;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;
use thiserror::Error;

pub mod eval;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NfaError {
    #[error("duplicate state '{0}'")]
    DuplicateState(String),
    #[error("nonexistent state '{0}'")]
    NonexistentState(String),
    #[error("nonexistent letter '{0}'")]
    NonexistentLetter(char),
    #[error("'ε' cannot be an element of the alphabet")]
    EpsilonInAlphabet,
    #[error("no initial state has been set")]
    MissingInitialState,
}

/// A nondeterministic finite automaton with ε-moves, denoted by its
/// alphabet, its states and the initial state
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Nfa {
    pub(crate) alphabet: Vec<char>,
    pub(crate) states: Vec<NfaState>,
    pub(crate) initial: Option<usize>,
}

/// A state in an NFA, which consists of its name, if it is accepting or
/// not, any amount of ε-transitions and any amount of transitions for
/// each letter of the alphabet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NfaState {
    pub(crate) name: Rc<str>,
    pub(crate) accepting: bool,
    pub(crate) epsilon_transitions: Vec<usize>,
    pub(crate) transitions: Vec<Vec<usize>>,
}

impl NfaState {
    /// Gets the name of this state
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Gets the transitions of this state, as sets of target state
    /// indices for each letter of the alphabet, in the alphabet's
    /// ordering
    pub fn transitions(&self) -> &[Vec<usize>] {
        self.transitions.as_slice()
    }

    /// Gets the ε-transitions of this state as a set of target state
    /// indices
    pub fn epsilon_transitions(&self) -> &[usize] {
        self.epsilon_transitions.as_slice()
    }
}

impl Nfa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new state with the given name and no transitions
    pub fn add_state(&mut self, name: &str) -> Result<(), NfaError> {
        if self.state_idx(name).is_some() {
            return Err(NfaError::DuplicateState(name.to_string()));
        }
        self.states.push(NfaState {
            name: Rc::from(name),
            accepting: false,
            epsilon_transitions: vec![],
            transitions: vec![vec![]; self.alphabet.len()],
        });
        Ok(())
    }

    /// Adds multiple states, failing on the first duplicate
    pub fn add_states<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), NfaError> {
        names.into_iter().try_for_each(|name| self.add_state(name))
    }

    /// Replaces the alphabet. ε is a sentinel, not a letter, so the
    /// character 'ε' is rejected. Duplicate letters are ignored;
    /// transitions on dropped letters are forgotten.
    pub fn set_alphabet(&mut self, letters: impl IntoIterator<Item = char>) -> Result<(), NfaError> {
        let mut new_alphabet = Vec::new();
        for letter in letters {
            if letter == 'ε' {
                return Err(NfaError::EpsilonInAlphabet);
            }
            if !new_alphabet.contains(&letter) {
                new_alphabet.push(letter);
            }
        }
        for state in self.states.iter_mut() {
            state.transitions = new_alphabet
                .iter()
                .map(|c| {
                    self.alphabet
                        .iter()
                        .position(|old| old == c)
                        .map(|idx| state.transitions[idx].clone())
                        .unwrap_or_default()
                })
                .collect();
        }
        self.alphabet = new_alphabet;
        Ok(())
    }

    /// Sets the initial state, which must exist
    pub fn set_initial(&mut self, name: &str) -> Result<(), NfaError> {
        match self.state_idx(name) {
            Some(idx) => {
                self.initial = Some(idx);
                Ok(())
            }
            None => Err(NfaError::NonexistentState(name.to_string())),
        }
    }

    /// Replaces the set of accepting states. If any name does not exist,
    /// an error is returned and the automaton is left unmodified.
    pub fn set_accepting<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), NfaError> {
        let mut accepting = HashSet::new();
        for name in names {
            let idx = self
                .state_idx(name)
                .ok_or_else(|| NfaError::NonexistentState(name.to_string()))?;
            accepting.insert(idx);
        }
        for (idx, state) in self.states.iter_mut().enumerate() {
            state.accepting = accepting.contains(&idx);
        }
        Ok(())
    }

    /// Adds transitions from `src` on `label` to all of `targets`,
    /// merging with any previously added targets. The label is either a
    /// letter of the alphabet or [Label::Epsilon].
    pub fn add_transition<'a>(
        &mut self,
        src: &str,
        label: impl Into<Label>,
        targets: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), NfaError> {
        let src_idx = self
            .state_idx(src)
            .ok_or_else(|| NfaError::NonexistentState(src.to_string()))?;
        let label = label.into();
        let letter_idx = match label {
            Label::Epsilon => None,
            Label::Symbol(c) => Some(self.letter_idx(c).ok_or(NfaError::NonexistentLetter(c))?),
        };
        let mut target_idx = Vec::new();
        for target in targets {
            let idx = self
                .state_idx(target)
                .ok_or_else(|| NfaError::NonexistentState(target.to_string()))?;
            target_idx.push(idx);
        }
        let set = match letter_idx {
            None => &mut self.states[src_idx].epsilon_transitions,
            Some(idx) => &mut self.states[src_idx].transitions[idx],
        };
        for idx in target_idx {
            if !set.contains(&idx) {
                set.push(idx);
            }
        }
        Ok(())
    }

    /// Adds multiple transitions, failing on the first invalid one
    pub fn add_transitions<'a>(
        &mut self,
        transitions: impl IntoIterator<Item = (&'a str, Label, &'a [&'a str])>,
    ) -> Result<(), NfaError> {
        transitions
            .into_iter()
            .try_for_each(|(src, label, targets)| {
                self.add_transition(src, label, targets.iter().copied())
            })
    }

    /// Checks if this automaton accepts the given input. The input is
    /// rejected right away if any of its letters is outside the alphabet.
    pub fn run(&self, input: &str) -> Result<bool, NfaError> {
        if input.chars().any(|c| self.letter_idx(c).is_none()) {
            return Ok(false);
        }
        let mut eval = self.evaluator()?;
        for letter in input.chars() {
            eval.step(letter);
        }
        Ok(eval.is_accepting())
    }

    /// Gets an evaluator, which is a struct that is used to evaluate
    /// strings with the automaton step by step. It starts out in the
    /// ε-closure of the initial state.
    pub fn evaluator(&self) -> Result<NfaEvaluator<'_>, NfaError> {
        let initial = self.initial.ok_or(NfaError::MissingInitialState)?;
        Ok(NfaEvaluator::new(self, initial))
    }

    /// Gives the ε-closure of a state, given the state index
    pub fn closure(&self, start: usize) -> Option<HashSet<usize>> {
        if start >= self.states.len() {
            return None;
        }
        let mut all = HashSet::from([start]);
        self.close_over_epsilon(&mut all);
        Some(all)
    }

    /// Extends a set of states to its ε-closure, in place
    pub(crate) fn close_over_epsilon(&self, states: &mut HashSet<usize>) {
        let mut stack: Vec<usize> = states.iter().copied().collect();
        while let Some(state) = stack.pop() {
            for &target in &self.states[state].epsilon_transitions {
                if states.insert(target) {
                    stack.push(target);
                }
            }
        }
    }

    /// Converts this NFA to a DFA using the subset construction. Each DFA
    /// state corresponds to an ε-closed set of NFA states and is named
    /// `s0`, `s1`, … in discovery order, the initial state being `s0`.
    /// Letters whose target set would be empty get no transition at all;
    /// the DFA simulator treats the missing transition as a rejection,
    /// matching the NFA which is stuck in the empty state set.
    pub fn to_dfa(&self) -> Result<Dfa, NfaError> {
        let initial_eval = self.evaluator()?;

        let mut ids: HashMap<Vec<usize>, usize> = HashMap::new();
        let mut accepting = vec![initial_eval.is_accepting()];
        let mut rows: Vec<Vec<Option<usize>>> = vec![vec![]];
        let mut queue = VecDeque::from([(0usize, initial_eval.clone())]);
        ids.insert(sorted_idx(initial_eval.current_states_idx()), 0);

        while let Some((id, eval)) = queue.pop_front() {
            let mut row = Vec::with_capacity(self.alphabet.len());
            for stepped in eval.step_all() {
                if stepped.current_states_idx().is_empty() {
                    row.push(None);
                    continue;
                }
                let key = sorted_idx(stepped.current_states_idx());
                let next_id = match ids.get(&key) {
                    Some(&existing) => existing,
                    None => {
                        let new_id = accepting.len();
                        ids.insert(key, new_id);
                        accepting.push(stepped.is_accepting());
                        rows.push(vec![]);
                        queue.push_back((new_id, stepped));
                        new_id
                    }
                };
                row.push(Some(next_id));
            }
            rows[id] = row;
        }

        let states = rows
            .into_iter()
            .zip(accepting)
            .enumerate()
            .map(|(idx, (transitions, accepting))| DfaState {
                name: Rc::from(format!("s{idx}")),
                accepting,
                transitions,
            })
            .collect();
        Ok(Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial: Some(0),
        })
    }

    /// Checks if this automaton has any ε-moves
    pub fn has_epsilon_moves(&self) -> bool {
        self.states
            .iter()
            .any(|state| !state.epsilon_transitions.is_empty())
    }

    /// Gets the alphabet of this NFA
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Gets the states of this NFA
    pub fn states(&self) -> &[NfaState] {
        self.states.as_slice()
    }

    /// Gets the initial state of this NFA, if one has been set
    pub fn initial_state(&self) -> Option<&NfaState> {
        self.initial.map(|idx| &self.states[idx])
    }

    /// Gets the index of the initial state of this NFA, if one has been
    /// set
    pub fn initial_state_index(&self) -> Option<usize> {
        self.initial
    }

    pub(crate) fn state_idx(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name.as_ref() == name)
    }

    pub(crate) fn letter_idx(&self, letter: char) -> Option<usize> {
        self.alphabet.iter().position(|&c| c == letter)
    }
}

/// Converts a set of indices to a sorted `Vec`, usable as a hash key
fn sorted_idx(set: &HashSet<usize>) -> Vec<usize> {
    let mut vec: Vec<usize> = set.iter().copied().collect();
    vec.sort_unstable();
    vec
}
