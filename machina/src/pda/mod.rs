//! # Pushdown automata
//! The PDA module includes the [Pda] struct, which holds the structure of
//! a pushdown automaton (input symbols, stack symbols, states, the
//! transition table keyed by state, input label and stack top, the
//! initial state and the initial stack symbol), and the two acceptance
//! modes wrapped around it: [FinalStatePda] and [EmptyStackPda]. The two
//! modes share the same nondeterministic simulator and differ only in
//! their termination predicate.
//!
//! The simulator explores configurations `(state, input position, stack)`
//! depth-first, and a configuration is accepting as soon as its mode's
//! predicate holds, whether or not input remains unread. Since
//! spontaneous moves consume no input, ε-cycles exist; repeated
//! configurations are pruned, and an explored-configuration budget turns
//! runaway searches into a
//! [SearchLimitExceeded](PdaError::SearchLimitExceeded) error instead of
//! a hang.
//!
//! ## Example
//! ```
//! use machina::pda::{EmptyStackPda, Pda};
//! use machina::label::Label;
//!
//! // Push a marker per 0, pop one per 1: the stack empties exactly
//! // when the 1s have matched the 0s
//! let mut pda = Pda::new();
//! pda.set_input_symbols(['0', '1']);
//! pda.set_stack_symbols(['0', 'Z']);
//! pda.add_states(["q0", "q1"]).unwrap();
//! pda.set_initial_state("q0").unwrap();
//! pda.set_initial_symbol('Z').unwrap();
//! pda.add_transition("q0", '0', 'Z', "q0", "Z0").unwrap();
//! pda.add_transition("q0", '0', '0', "q0", "00").unwrap();
//! pda.add_transition("q0", '1', '0', "q1", "").unwrap();
//! pda.add_transition("q1", '1', '0', "q1", "").unwrap();
//! pda.add_transition("q1", Label::Epsilon, 'Z', "q1", "").unwrap();
//!
//! let pda = EmptyStackPda::new(pda);
//! assert!(pda.run("01").unwrap());
//! assert!(pda.run("0011").unwrap());
//! assert!(!pda.run("001").unwrap());
//! ```

use crate::label::Label;
use crate::table::KeyedTable;
use std::collections::HashSet;
use std::rc::Rc;
use thiserror::Error;

/// The default explored-configuration budget of [FinalStatePda::run] and
/// [EmptyStackPda::run]
pub const DEFAULT_SEARCH_LIMIT: usize = 100_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdaError {
    #[error("duplicate state '{0}'")]
    DuplicateState(String),
    #[error("nonexistent state '{0}'")]
    NonexistentState(String),
    #[error("nonexistent input symbol '{0}'")]
    NonexistentInputSymbol(char),
    #[error("nonexistent stack symbol '{0}'")]
    NonexistentStackSymbol(char),
    #[error("no initial state has been set")]
    MissingInitialState,
    #[error("no initial stack symbol has been set")]
    MissingInitialSymbol,
    #[error("search limit exceeded before the input could be decided")]
    SearchLimitExceeded,
}

/// One transition of a PDA, as exposed by [Pda::moves]: in state `from`,
/// on `input` (a letter or ε) with `top` on the stack, go to state `to`,
/// popping `top` and pushing `push` (left to right, so its last symbol
/// ends up on top)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdaMove<'a> {
    pub from: &'a str,
    pub input: Label,
    pub top: char,
    pub to: &'a str,
    pub push: &'a [char],
}

/// The structure common to both acceptance modes of a pushdown
/// automaton. Built through the builder operations, then wrapped in a
/// [FinalStatePda] or [EmptyStackPda] to be run.
#[derive(Debug, Clone, Default)]
pub struct Pda {
    input_symbols: Vec<char>,
    stack_symbols: Vec<char>,
    states: Vec<Rc<str>>,
    transitions: KeyedTable<(usize, Label, char), Vec<(usize, Vec<char>)>>,
    initial_state: Option<usize>,
    initial_symbol: Option<char>,
}

impl Pda {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the input alphabet. Duplicates are ignored.
    pub fn set_input_symbols(&mut self, symbols: impl IntoIterator<Item = char>) {
        self.input_symbols.clear();
        for symbol in symbols {
            if !self.input_symbols.contains(&symbol) {
                self.input_symbols.push(symbol);
            }
        }
    }

    /// Replaces the stack alphabet. Duplicates are ignored.
    pub fn set_stack_symbols(&mut self, symbols: impl IntoIterator<Item = char>) {
        self.stack_symbols.clear();
        for symbol in symbols {
            if !self.stack_symbols.contains(&symbol) {
                self.stack_symbols.push(symbol);
            }
        }
    }

    /// Adds a new state with the given name
    pub fn add_state(&mut self, name: &str) -> Result<(), PdaError> {
        if self.state_idx(name).is_some() {
            return Err(PdaError::DuplicateState(name.to_string()));
        }
        self.states.push(Rc::from(name));
        Ok(())
    }

    /// Adds multiple states, failing on the first duplicate
    pub fn add_states<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), PdaError> {
        names.into_iter().try_for_each(|name| self.add_state(name))
    }

    /// Sets the initial state, which must exist
    pub fn set_initial_state(&mut self, name: &str) -> Result<(), PdaError> {
        match self.state_idx(name) {
            Some(idx) => {
                self.initial_state = Some(idx);
                Ok(())
            }
            None => Err(PdaError::NonexistentState(name.to_string())),
        }
    }

    /// Sets the initial stack symbol, which must be a stack symbol
    pub fn set_initial_symbol(&mut self, symbol: char) -> Result<(), PdaError> {
        if !self.stack_symbols.contains(&symbol) {
            return Err(PdaError::NonexistentStackSymbol(symbol));
        }
        self.initial_symbol = Some(symbol);
        Ok(())
    }

    /// Adds the transition `(from, input, top) -> (to, push)`. The input
    /// is a letter of the input alphabet or [Label::Epsilon]; `push` is a
    /// string over the stack alphabet, pushed left to right so that its
    /// last symbol ends up on top (the empty string pushes nothing).
    pub fn add_transition(
        &mut self,
        from: &str,
        input: impl Into<Label>,
        top: char,
        to: &str,
        push: &str,
    ) -> Result<(), PdaError> {
        let from = self
            .state_idx(from)
            .ok_or_else(|| PdaError::NonexistentState(from.to_string()))?;
        let to = self
            .state_idx(to)
            .ok_or_else(|| PdaError::NonexistentState(to.to_string()))?;
        let input = input.into();
        if let Label::Symbol(c) = input {
            if !self.input_symbols.contains(&c) {
                return Err(PdaError::NonexistentInputSymbol(c));
            }
        }
        if !self.stack_symbols.contains(&top) {
            return Err(PdaError::NonexistentStackSymbol(top));
        }
        let push: Vec<char> = push.chars().collect();
        if let Some(&symbol) = push.iter().find(|c| !self.stack_symbols.contains(c)) {
            return Err(PdaError::NonexistentStackSymbol(symbol));
        }
        let moves = self
            .transitions
            .entry((from, input, top))
            .or_insert_with(Vec::new);
        if !moves.contains(&(to, push.clone())) {
            moves.push((to, push));
        }
        Ok(())
    }

    /// Gets the input alphabet
    pub fn input_symbols(&self) -> &[char] {
        &self.input_symbols
    }

    /// Gets the stack alphabet
    pub fn stack_symbols(&self) -> &[char] {
        &self.stack_symbols
    }

    /// Gets the state names
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|name| name.as_ref())
    }

    /// Gets the initial state name, if one has been set
    pub fn initial_state(&self) -> Option<&str> {
        self.initial_state.map(|idx| self.states[idx].as_ref())
    }

    /// Gets the initial stack symbol, if one has been set
    pub fn initial_symbol(&self) -> Option<char> {
        self.initial_symbol
    }

    /// Gets all transitions, in a deterministic order
    pub fn moves(&self) -> Vec<PdaMove<'_>> {
        let mut moves: Vec<PdaMove> = self
            .transitions
            .iter()
            .flat_map(|((from, input, top), targets)| {
                targets.iter().map(|(to, push)| PdaMove {
                    from: self.states[*from].as_ref(),
                    input: *input,
                    top: *top,
                    to: self.states[*to].as_ref(),
                    push: push.as_slice(),
                })
            })
            .collect();
        moves.sort_by_key(|m| (m.from.to_string(), m.to.to_string(), m.input.symbol(), m.top));
        moves
    }

    fn state_idx(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.as_ref() == name)
    }

    /// The shared nondeterministic simulator: a depth-first search over
    /// configurations `(state, input position, stack)`. A configuration
    /// accepts the moment the mode's `accepting` predicate holds; the
    /// predicate is tested on every configuration, the initial one
    /// included, before any remaining input is considered. Consuming
    /// moves advance the input position, spontaneous moves do not.
    /// Already-seen configurations are skipped, and exploring more than
    /// `limit` configurations is an error.
    fn simulate(
        &self,
        input: &str,
        limit: usize,
        accepting: impl Fn(usize, &[char]) -> bool,
    ) -> Result<bool, PdaError> {
        let initial_state = self.initial_state.ok_or(PdaError::MissingInitialState)?;
        let initial_symbol = self.initial_symbol.ok_or(PdaError::MissingInitialSymbol)?;
        let input: Vec<char> = input.chars().collect();

        let mut visited: HashSet<(usize, usize, Vec<char>)> = HashSet::new();
        let mut pending = vec![(initial_state, 0usize, vec![initial_symbol])];
        let mut explored = 0usize;
        while let Some((state, position, stack)) = pending.pop() {
            if !visited.insert((state, position, stack.clone())) {
                continue;
            }
            explored += 1;
            if explored > limit {
                return Err(PdaError::SearchLimitExceeded);
            }
            if accepting(state, &stack) {
                return Ok(true);
            }
            let Some(&top) = stack.last() else {
                continue;
            };
            let mut keys = vec![(state, Label::Epsilon, top)];
            if let Some(&letter) = input.get(position) {
                keys.push((state, Label::Symbol(letter), top));
            }
            for key in keys {
                let Some(moves) = self.transitions.get(&key) else {
                    continue;
                };
                let next_position = if key.1.is_epsilon() {
                    position
                } else {
                    position + 1
                };
                for (target, push) in moves {
                    let mut next_stack = stack.clone();
                    next_stack.pop();
                    next_stack.extend(push.iter().copied());
                    pending.push((*target, next_position, next_stack));
                }
            }
        }
        Ok(false)
    }
}

/// A pushdown automaton accepting by final state: an input is accepted
/// iff some run reaches an accepting state. The predicate is tested on
/// every configuration, so a machine whose initial state is accepting
/// accepts without reading any input.
#[derive(Debug, Clone)]
pub struct FinalStatePda {
    pda: Pda,
    accepting: HashSet<usize>,
}

impl FinalStatePda {
    /// Wraps a PDA structure with a set of accepting states, which must
    /// all exist
    pub fn new<'a>(
        pda: Pda,
        accepting: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, PdaError> {
        let mut accepting_idx = HashSet::new();
        for name in accepting {
            let idx = pda
                .state_idx(name)
                .ok_or_else(|| PdaError::NonexistentState(name.to_string()))?;
            accepting_idx.insert(idx);
        }
        Ok(Self {
            pda,
            accepting: accepting_idx,
        })
    }

    /// Gets the underlying PDA structure
    pub fn pda(&self) -> &Pda {
        &self.pda
    }

    /// Checks if the named state is accepting
    pub fn is_accepting(&self, name: &str) -> bool {
        self.pda
            .state_idx(name)
            .map_or(false, |idx| self.accepting.contains(&idx))
    }

    /// Tests membership of the input, with the default search budget
    pub fn run(&self, input: &str) -> Result<bool, PdaError> {
        self.run_bounded(input, DEFAULT_SEARCH_LIMIT)
    }

    /// Tests membership of the input, exploring at most `limit`
    /// configurations
    pub fn run_bounded(&self, input: &str, limit: usize) -> Result<bool, PdaError> {
        self.pda
            .simulate(input, limit, |state, _| self.accepting.contains(&state))
    }
}

/// A pushdown automaton accepting by empty stack: an input is accepted
/// iff some run empties the stack, tested on every configuration
#[derive(Debug, Clone)]
pub struct EmptyStackPda {
    pda: Pda,
}

impl EmptyStackPda {
    pub fn new(pda: Pda) -> Self {
        Self { pda }
    }

    /// Gets the underlying PDA structure
    pub fn pda(&self) -> &Pda {
        &self.pda
    }

    /// Tests membership of the input, with the default search budget
    pub fn run(&self, input: &str) -> Result<bool, PdaError> {
        self.run_bounded(input, DEFAULT_SEARCH_LIMIT)
    }

    /// Tests membership of the input, exploring at most `limit`
    /// configurations
    pub fn run_bounded(&self, input: &str, limit: usize) -> Result<bool, PdaError> {
        self.pda
            .simulate(input, limit, |_, stack| stack.is_empty())
    }
}
