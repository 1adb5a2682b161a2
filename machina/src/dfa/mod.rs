//! # Deterministic Finite Automaton
//! The DFA module includes the [Dfa] struct which represents a
//! [Deterministic finite automaton](https://en.wikipedia.org/wiki/Deterministic_finite_automaton)
//! with a possibly partial transition function. A DFA is built
//! incrementally through the builder operations ([Dfa::add_state],
//! [Dfa::set_alphabet], [Dfa::set_initial], [Dfa::set_accepting],
//! [Dfa::add_transition]), or produced by [subset
//! construction](crate::nfa::Nfa::to_dfa) from an NFA.
//!
//! ## Example
//! ```
//! use machina::dfa::Dfa;
//!
//! // A DFA accepting exactly the string "010"
//! let mut dfa = Dfa::new();
//! dfa.set_alphabet(['0', '1']);
//! dfa.add_states(["q0", "q1", "q2", "q3"]).unwrap();
//! dfa.set_initial("q0").unwrap();
//! dfa.set_accepting(["q3"]).unwrap();
//! dfa.set_transitions([
//!     ("q0", '0', "q1"),
//!     ("q1", '1', "q2"),
//!     ("q2", '0', "q3"),
//! ]).unwrap();
//!
//! assert!(!dfa.run("0").unwrap());
//! assert!(!dfa.run("01").unwrap());
//! assert!(dfa.run("010").unwrap());
//! ```
//!
//! ## Operations
//! * [Simulation](Dfa::run), which rejects on letters outside the alphabet
//!   and on undefined transitions
//! * [Removing unreachable states](Dfa::remove_unreachable)
//! * [Minimisation](Dfa::minimize) by the table-filling algorithm, with
//!   the equivalence classes recovered through a
//!   [disjoint-set forest](crate::dset::DisjointSet). The minimised
//!   automaton renames its states `q0`, `q1`, … in class order. Both an
//!   in-place ([Dfa::minimize]) and a new-value ([Dfa::minimized]) form
//!   exist.
//! * [Totalisation](Dfa::complete) over a chosen alphabet by adding at
//!   most one `q_dead` sink state, again in both
//!   in-place and [new-value](Dfa::completed) forms
//! * [Product construction](Dfa::product_construction) over the union
//!   alphabet with a caller-chosen accepting combinator, and the boolean
//!   operations built on it: [union](Dfa::union),
//!   [intersection](Dfa::intersection), [difference](Dfa::difference),
//!   [symmetric difference](Dfa::symmetric_difference) and
//!   [complement](Dfa::complement), each minimised before being returned
//! * [Emptiness](Dfa::is_empty) and [language equivalence](Dfa::equivalent_to)
//! * [Translation to a regular expression](Dfa::to_regex) by state
//!   elimination

use crate::dset::DisjointSet;
use crate::nfa::{Nfa, NfaState};
pub use eval::DfaEvaluator;
use std::collections::HashSet;
use std::rc::Rc;
use thiserror::Error;

pub mod eval;
mod regex_out;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DfaError {
    #[error("duplicate state '{0}'")]
    DuplicateState(String),
    #[error("nonexistent state '{0}'")]
    NonexistentState(String),
    #[error("nonexistent letter '{0}'")]
    NonexistentLetter(char),
    #[error("conflicting transition from state '{0}' on letter '{1}'")]
    ConflictingTransition(String, char),
    #[error("no initial state has been set")]
    MissingInitialState,
}

/// A deterministic finite automaton, defined by its *alphabet* of single
/// letters, its *states*, one of them the *initial state*, a subset of
/// them *accepting*, and a partial *transition function* from state and
/// letter to state. See the [module-level documentation](crate::dfa) for
/// more info.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Dfa {
    pub(crate) alphabet: Vec<char>,
    pub(crate) states: Vec<DfaState>,
    pub(crate) initial: Option<usize>,
}

/// A state in a DFA, which consists of its name, if it is accepting or
/// not, and an optional target state for each letter of the alphabet (in
/// the alphabet's ordering)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) name: Rc<str>,
    pub(crate) accepting: bool,
    pub(crate) transitions: Vec<Option<usize>>,
}

impl DfaState {
    /// Gets the name of this state
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Gets the transitions of this state, as an optional target state
    /// index for each letter of the alphabet, in the alphabet's ordering
    pub fn transitions(&self) -> &[Option<usize>] {
        self.transitions.as_slice()
    }
}

impl Dfa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new state with the given name and no transitions
    pub fn add_state(&mut self, name: &str) -> Result<(), DfaError> {
        if self.state_idx(name).is_some() {
            return Err(DfaError::DuplicateState(name.to_string()));
        }
        self.states.push(DfaState {
            name: Rc::from(name),
            accepting: false,
            transitions: vec![None; self.alphabet.len()],
        });
        Ok(())
    }

    /// Adds multiple states, failing on the first duplicate
    pub fn add_states<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), DfaError> {
        names.into_iter().try_for_each(|name| self.add_state(name))
    }

    /// Replaces the alphabet. Duplicate letters are ignored. Transitions
    /// on letters present in both the old and the new alphabet are kept;
    /// transitions on dropped letters are forgotten.
    pub fn set_alphabet(&mut self, letters: impl IntoIterator<Item = char>) {
        let mut new_alphabet = Vec::new();
        for letter in letters {
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
                        .and_then(|idx| state.transitions[idx])
                })
                .collect();
        }
        self.alphabet = new_alphabet;
    }

    /// Sets the initial state, which must exist
    pub fn set_initial(&mut self, name: &str) -> Result<(), DfaError> {
        match self.state_idx(name) {
            Some(idx) => {
                self.initial = Some(idx);
                Ok(())
            }
            None => Err(DfaError::NonexistentState(name.to_string())),
        }
    }

    /// Replaces the set of accepting states. If any name does not exist,
    /// an error is returned and the automaton is left unmodified.
    pub fn set_accepting<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), DfaError> {
        let mut accepting = HashSet::new();
        for name in names {
            let idx = self
                .state_idx(name)
                .ok_or_else(|| DfaError::NonexistentState(name.to_string()))?;
            accepting.insert(idx);
        }
        for (idx, state) in self.states.iter_mut().enumerate() {
            state.accepting = accepting.contains(&idx);
        }
        Ok(())
    }

    /// Adds a transition. Source and target must be states and the letter
    /// must be in the alphabet; defining a second, different target for
    /// the same source and letter is an error (re-adding the same
    /// transition is not).
    pub fn add_transition(&mut self, src: &str, letter: char, target: &str) -> Result<(), DfaError> {
        let src_idx = self
            .state_idx(src)
            .ok_or_else(|| DfaError::NonexistentState(src.to_string()))?;
        let letter_idx = self
            .letter_idx(letter)
            .ok_or(DfaError::NonexistentLetter(letter))?;
        let target_idx = self
            .state_idx(target)
            .ok_or_else(|| DfaError::NonexistentState(target.to_string()))?;
        match self.states[src_idx].transitions[letter_idx] {
            None => {
                self.states[src_idx].transitions[letter_idx] = Some(target_idx);
                Ok(())
            }
            Some(existing) if existing == target_idx => Ok(()),
            Some(_) => Err(DfaError::ConflictingTransition(src.to_string(), letter)),
        }
    }

    /// Replaces all transitions by the given `(source, letter, target)`
    /// triples, failing on the first invalid one
    pub fn set_transitions<'a>(
        &mut self,
        transitions: impl IntoIterator<Item = (&'a str, char, &'a str)>,
    ) -> Result<(), DfaError> {
        self.states
            .iter_mut()
            .for_each(|state| state.transitions.fill(None));
        transitions
            .into_iter()
            .try_for_each(|(src, letter, target)| self.add_transition(src, letter, target))
    }

    /// Checks if this automaton accepts the given input. The input is
    /// rejected right away if any of its letters is outside the alphabet,
    /// and rejected when an undefined transition is hit.
    pub fn run(&self, input: &str) -> Result<bool, DfaError> {
        if input.chars().any(|c| self.letter_idx(c).is_none()) {
            return Ok(false);
        }
        let mut eval = self.evaluator()?;
        eval.step_multiple(input.chars());
        Ok(eval.is_accepting())
    }

    /// As [Dfa::run], but appends a trace of every step to `trace`: the
    /// state before the step, the input with a caret under the letter
    /// being read, and the state stepped to
    pub fn run_verbose(&self, input: &str, trace: &mut String) -> Result<bool, DfaError> {
        if input.chars().any(|c| self.letter_idx(c).is_none()) {
            return Ok(false);
        }
        let mut eval = self.evaluator()?;
        for (idx, letter) in input.chars().enumerate() {
            let pre = eval
                .current_state()
                .expect("the evaluator returns before it dies")
                .name()
                .to_string();
            trace.push_str(&format!(
                "Pre    : {pre}\nInput  : {input}\nRead   : {caret}^\n",
                caret = " ".repeat(idx)
            ));
            match eval.step(letter) {
                None => return Ok(false),
                Some(next) => trace.push_str(&format!("Next   : {}\n\n", next.name())),
            }
        }
        Ok(eval.is_accepting())
    }

    /// Gets an evaluator, which is a struct that is used to evaluate
    /// strings with the automaton step by step
    pub fn evaluator(&self) -> Result<DfaEvaluator<'_>, DfaError> {
        let initial = self.initial.ok_or(DfaError::MissingInitialState)?;
        Ok(DfaEvaluator::new(self, initial))
    }

    /// Makes accepting states non-accepting and non-accepting states
    /// accepting. On a total automaton this makes it accept the
    /// complement language; see [Dfa::complement] for the operation that
    /// totalises first.
    pub fn invert(&mut self) {
        self.states
            .iter_mut()
            .for_each(|s| s.accepting = !s.accepting)
    }

    /// Removes all states that cannot be reached from the initial state,
    /// along with their transitions
    pub fn remove_unreachable(&mut self) -> Result<(), DfaError> {
        let reachable = self.reachable_state_idx()?;
        let to_remove = (0..self.states.len())
            .filter(|idx| !reachable.contains(idx))
            .collect();
        self.remove_states(to_remove);
        Ok(())
    }

    /// Finds the states reachable from the initial state, as indices
    pub fn reachable_state_idx(&self) -> Result<HashSet<usize>, DfaError> {
        let initial = self.initial.ok_or(DfaError::MissingInitialState)?;
        let mut reachable = HashSet::from([initial]);
        let mut stack = vec![initial];
        while let Some(state) = stack.pop() {
            for target in self.states[state].transitions.iter().flatten() {
                if reachable.insert(*target) {
                    stack.push(*target);
                }
            }
        }
        Ok(reachable)
    }

    /// Checks if the language of this automaton is empty, that is, if no
    /// accepting state is reachable from the initial state
    pub fn is_empty(&self) -> Result<bool, DfaError> {
        let reachable = self.reachable_state_idx()?;
        Ok(!reachable.iter().any(|&idx| self.states[idx].accepting))
    }

    /// Minimises this automaton in place. See [Dfa::minimized] for the
    /// new-value form and the description of the algorithm.
    pub fn minimize(&mut self) -> Result<(), DfaError> {
        *self = self.minimized()?;
        Ok(())
    }

    /// Returns the minimal automaton for this automaton's language,
    /// leaving this automaton untouched. Unreachable states are removed
    /// first; then pairs of states are marked distinguishable to a fixed
    /// point (split by acceptance, by a letter leading to a
    /// distinguishable pair, or by a letter on which exactly one of the
    /// two transitions is defined), and the unmarked pairs are merged
    /// into equivalence classes. The classes become the states of the
    /// result, named `q0`, `q1`, … in class-enumeration order.
    ///
    /// ```
    /// use machina::dfa::Dfa;
    ///
    /// // Two interchangeable accepting states looping on each other
    /// let mut dfa = Dfa::new();
    /// dfa.set_alphabet(['a']);
    /// dfa.add_states(["x", "y"]).unwrap();
    /// dfa.set_initial("x").unwrap();
    /// dfa.set_accepting(["x", "y"]).unwrap();
    /// dfa.set_transitions([("x", 'a', "y"), ("y", 'a', "x")]).unwrap();
    ///
    /// let minimal = dfa.minimized().unwrap();
    /// assert_eq!(minimal.states().len(), 1);
    /// assert_eq!(minimal.states()[0].name(), "q0");
    /// assert!(minimal.run("aaa").unwrap());
    /// ```
    pub fn minimized(&self) -> Result<Dfa, DfaError> {
        let mut dfa = self.clone();
        dfa.remove_unreachable()?;
        let n = dfa.states.len();

        // marked[i][j] (i > j) <=> states i and j are distinguishable
        let mut marked = vec![vec![false; n]; n];
        for i in 0..n {
            for j in 0..i {
                if dfa.states[i].accepting != dfa.states[j].accepting {
                    marked[i][j] = true;
                }
            }
        }
        let mut updated = true;
        while updated {
            updated = false;
            for i in 0..n {
                for j in 0..i {
                    if !marked[i][j] && dfa.splits(i, j, &marked) {
                        marked[i][j] = true;
                        updated = true;
                    }
                }
            }
        }

        let mut classes = DisjointSet::new(0..n);
        for i in 0..n {
            for j in 0..i {
                if !marked[i][j] {
                    classes
                        .union(&i, &j)
                        .expect("all state indices are members");
                }
            }
        }
        let classes = classes.classes();

        let mut class_of = vec![0; n];
        for (class_idx, class) in classes.iter().enumerate() {
            for &member in class {
                class_of[member] = class_idx;
            }
        }

        let mut states: Vec<DfaState> = (0..classes.len())
            .map(|idx| DfaState {
                name: Rc::from(format!("q{idx}")),
                accepting: false,
                transitions: vec![None; dfa.alphabet.len()],
            })
            .collect();
        for (class_idx, class) in classes.iter().enumerate() {
            for &member in class {
                if dfa.states[member].accepting {
                    states[class_idx].accepting = true;
                }
                for (letter_idx, transition) in dfa.states[member].transitions.iter().enumerate() {
                    if let Some(target) = transition {
                        states[class_idx].transitions[letter_idx] = Some(class_of[*target]);
                    }
                }
            }
        }

        let initial = dfa.initial.ok_or(DfaError::MissingInitialState)?;
        Ok(Dfa {
            alphabet: dfa.alphabet,
            states,
            initial: Some(class_of[initial]),
        })
    }

    /// Checks whether some letter tells the states `i` and `j` apart,
    /// either by exactly one of the transitions being undefined or by the
    /// targets being a marked pair
    fn splits(&self, i: usize, j: usize, marked: &[Vec<bool>]) -> bool {
        self.states[i]
            .transitions
            .iter()
            .zip(&self.states[j].transitions)
            .any(|pair| match pair {
                (None, None) => false,
                (Some(_), None) | (None, Some(_)) => true,
                (Some(a), Some(b)) => a != b && marked[*a.max(b)][*a.min(b)],
            })
    }

    /// Totalises the transition function in place over the given
    /// alphabet: the alphabet is replaced by `alphabet`, and every
    /// missing transition is routed to a fresh `q_dead` sink state that
    /// loops to itself on every letter. The sink is only added if some
    /// transition is actually missing. See [Dfa::completed] for the
    /// new-value form.
    pub fn complete(&mut self, alphabet: impl IntoIterator<Item = char>) {
        self.set_alphabet(alphabet);
        let missing = self
            .states
            .iter()
            .any(|state| state.transitions.iter().any(Option::is_none));
        if !missing {
            return;
        }
        let dead = self.states.len();
        let name = self.fresh_name("q_dead");
        self.states.push(DfaState {
            name,
            accepting: false,
            transitions: vec![Some(dead); self.alphabet.len()],
        });
        for state in self.states.iter_mut() {
            for transition in state.transitions.iter_mut() {
                transition.get_or_insert(dead);
            }
        }
    }

    /// Returns a totalised copy of this automaton over the given
    /// alphabet, leaving this automaton untouched
    pub fn completed(&self, alphabet: impl IntoIterator<Item = char>) -> Dfa {
        let mut dfa = self.clone();
        dfa.complete(alphabet);
        dfa
    }

    /// Constructs a new DFA from two DFAs using the product construction
    /// over the union of their alphabets. The states of the product are
    /// all pairs of states `(q, p)`, named `"q,p"`, the initial state is
    /// the pair of initial states, and there is a transition on a letter
    /// exactly when both operands define one. Whether a pair is accepting
    /// is given by the `combinator`, so that
    /// `a.product_construction(&b, |s1, s2| s1.is_accepting() && s2.is_accepting())`
    /// is the intersection construction (on totalised operands).
    pub fn product_construction(
        &self,
        other: &Self,
        mut combinator: impl FnMut(&DfaState, &DfaState) -> bool,
    ) -> Result<Dfa, DfaError> {
        let q1 = self.initial.ok_or(DfaError::MissingInitialState)?;
        let q2 = other.initial.ok_or(DfaError::MissingInitialState)?;

        let mut alphabet = self.alphabet.clone();
        for &letter in &other.alphabet {
            if !alphabet.contains(&letter) {
                alphabet.push(letter);
            }
        }

        let n2 = other.states.len();
        let pair_idx = |i: usize, j: usize| i * n2 + j;

        let mut states = Vec::with_capacity(self.states.len() * n2);
        for (i, s1) in self.states.iter().enumerate() {
            for (j, s2) in other.states.iter().enumerate() {
                debug_assert_eq!(states.len(), pair_idx(i, j));
                let transitions = alphabet
                    .iter()
                    .map(|&letter| {
                        let t1 = self.letter_idx(letter).and_then(|idx| s1.transitions[idx]);
                        let t2 = other.letter_idx(letter).and_then(|idx| s2.transitions[idx]);
                        match (t1, t2) {
                            (Some(t1), Some(t2)) => Some(pair_idx(t1, t2)),
                            _ => None,
                        }
                    })
                    .collect();
                states.push(DfaState {
                    name: Rc::from(format!("{},{}", s1.name, s2.name)),
                    accepting: combinator(s1, s2),
                    transitions,
                });
            }
        }

        Ok(Dfa {
            alphabet,
            states,
            initial: Some(pair_idx(q1, q2)),
        })
    }

    /// Constructs the union of two DFAs: a minimal DFA over the union
    /// alphabet accepting exactly those strings accepted by the first,
    /// the second, or both
    pub fn union(&self, other: &Self) -> Result<Dfa, DfaError> {
        self.boolean_op(other, |s1, s2| s1.accepting || s2.accepting)
    }

    /// Constructs the intersection of two DFAs: a minimal DFA over the
    /// union alphabet accepting exactly those strings accepted by both
    pub fn intersection(&self, other: &Self) -> Result<Dfa, DfaError> {
        self.boolean_op(other, |s1, s2| s1.accepting && s2.accepting)
    }

    /// Constructs the difference of two DFAs: a minimal DFA over the
    /// union alphabet accepting exactly those strings accepted by the
    /// first but not the second
    pub fn difference(&self, other: &Self) -> Result<Dfa, DfaError> {
        self.boolean_op(other, |s1, s2| s1.accepting && !s2.accepting)
    }

    /// Constructs the symmetric difference of two DFAs: a minimal DFA
    /// over the union alphabet accepting exactly those strings accepted
    /// by the first or the second, but not both
    pub fn symmetric_difference(&self, other: &Self) -> Result<Dfa, DfaError> {
        self.boolean_op(other, |s1, s2| s1.accepting != s2.accepting)
    }

    /// Constructs the complement of this DFA over its own alphabet, by
    /// totalising and flipping the accepting states. The result is
    /// minimised.
    pub fn complement(&self) -> Result<Dfa, DfaError> {
        let mut complement = self.completed(self.alphabet.iter().copied());
        complement.invert();
        complement.minimize()?;
        Ok(complement)
    }

    fn boolean_op(
        &self,
        other: &Self,
        combinator: impl FnMut(&DfaState, &DfaState) -> bool,
    ) -> Result<Dfa, DfaError> {
        let mut alphabet = self.alphabet.clone();
        for &letter in &other.alphabet {
            if !alphabet.contains(&letter) {
                alphabet.push(letter);
            }
        }
        let a1 = self.completed(alphabet.iter().copied());
        let a2 = other.completed(alphabet.iter().copied());
        let mut product = a1.product_construction(&a2, combinator)?;
        product.minimize()?;
        Ok(product)
    }

    /// Checks if this DFA accepts the same language as another DFA, over
    /// the union of their alphabets. Two automata with empty languages
    /// are equivalent, no matter their shape.
    pub fn equivalent_to(&self, other: &Dfa) -> Result<bool, DfaError> {
        self.symmetric_difference(other)?.is_empty()
    }

    /// Converts this DFA to an NFA accepting the same language. All state
    /// names are kept; undefined transitions become empty target sets.
    pub fn to_nfa(self) -> Nfa {
        let Dfa {
            alphabet,
            states,
            initial,
        } = self;
        let states = states
            .into_iter()
            .map(|state| NfaState {
                name: state.name,
                accepting: state.accepting,
                epsilon_transitions: vec![],
                transitions: state
                    .transitions
                    .into_iter()
                    .map(|t| t.into_iter().collect())
                    .collect(),
            })
            .collect();
        Nfa {
            alphabet,
            states,
            initial,
        }
    }

    /// Gets the alphabet of this DFA
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Gets the states of this DFA
    pub fn states(&self) -> &[DfaState] {
        self.states.as_slice()
    }

    /// Gets the initial state of this DFA, if one has been set
    pub fn initial_state(&self) -> Option<&DfaState> {
        self.initial.map(|idx| &self.states[idx])
    }

    /// Gets the index of the initial state of this DFA, if one has been
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

    fn fresh_name(&self, wanted: &str) -> Rc<str> {
        if self.state_idx(wanted).is_none() {
            Rc::from(wanted)
        } else {
            (0..)
                .map(|i| format!("{wanted}{i}"))
                .find(|name| self.state_idx(name).is_none())
                .map(|name| Rc::from(name.as_str()))
                .expect("some numbered name is unused")
        }
    }

    /// Removes the states with the given indices, remapping the
    /// transitions of the remaining states. The initial state cannot be
    /// removed and causes a panic if attempted.
    fn remove_states(&mut self, mut to_remove: Vec<usize>) {
        if to_remove.is_empty() {
            return;
        }
        to_remove.sort_unstable();
        to_remove.dedup();
        if let Some(initial) = self.initial {
            match to_remove.binary_search(&initial) {
                // We removed "less than" states before the initial state
                Err(less_than) => self.initial = Some(initial - less_than),
                Ok(_) => panic!("Cannot remove initial state"),
            }
        }

        let mut new_idx = vec![None; self.states.len()];
        let mut next = 0;
        for (idx, slot) in new_idx.iter_mut().enumerate() {
            if to_remove.binary_search(&idx).is_err() {
                *slot = Some(next);
                next += 1;
            }
        }

        let mut old_states = std::mem::take(&mut self.states);
        for (idx, mut state) in old_states.drain(..).enumerate() {
            if new_idx[idx].is_none() {
                continue;
            }
            for transition in state.transitions.iter_mut() {
                *transition = transition.and_then(|target| new_idx[target]);
            }
            self.states.push(state);
        }
    }
}
