//!# machina
//!
//! `machina` is a Rust library for the classical automata of compiler
//! theory: deterministic finite automata, nondeterministic finite
//! automata with ε-moves, pushdown automata in both acceptance modes,
//! and context-free grammars with LL(1) predictive parsing, together
//! with an extended-regular-expression compiler and a DFA-driven lexer
//! harness.
//!
//! ## Usage
//!
//! ```rust
//! use machina::regex::Regex;
//!
//! fn main() {
//!     // Compile a regex to an NFA with the Thompson construction,
//!     // lower it to a DFA with the subset construction, and minimise
//!     let regex = Regex::new("1*0(0|1)*").unwrap();
//!     let mut dfa = regex.to_nfa().to_dfa().unwrap();
//!     dfa.minimize().unwrap();
//!
//!     // The strings over {0, 1} containing at least one 0
//!     assert_eq!(dfa.states().len(), 2);
//!     assert!(dfa.run("1110").unwrap());
//!     assert!(dfa.run("111100001").unwrap());
//!     assert!(!dfa.run("1").unwrap());
//!
//!     // Automata compose under the boolean operations
//!     let contains_one = Regex::new("0*1(0|1)*").unwrap().to_nfa().to_dfa().unwrap();
//!     let both = dfa.intersection(&contains_one).unwrap();
//!     assert!(both.run("10").unwrap());
//!     assert!(!both.run("00").unwrap());
//! }
//! ```
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * Building [DFAs](dfa::Dfa), [NFAs](nfa::Nfa) and [PDAs](pda::Pda)
//!   state by state, with structural invariants checked on every step
//! * [Simulating words on a DFA](dfa::Dfa::run) and
//!   [on an NFA](nfa::Nfa::run) (via ε-closures)
//! * [Compiling extended regular expressions](regex::Regex) (Thompson
//!   construction) and [lowering NFAs to DFAs](nfa::Nfa::to_dfa) (subset
//!   construction)
//! * [Minimising a DFA](dfa::Dfa::minimize) with the table-filling
//!   algorithm, in place or [as a new value](dfa::Dfa::minimized)
//! * The boolean algebra of DFAs over the
//!   [product construction](dfa::Dfa::product_construction):
//!   [union](dfa::Dfa::union), [intersection](dfa::Dfa::intersection),
//!   [difference](dfa::Dfa::difference) and
//!   [complement](dfa::Dfa::complement), plus
//!   [emptiness](dfa::Dfa::is_empty) and
//!   [language equivalence](dfa::Dfa::equivalent_to)
//! * [Translating a DFA back to a regular expression](dfa::Dfa::to_regex)
//!   by state elimination
//! * [FIRST/FOLLOW computation and LL(1) parsing](grammar::ll1::Ll1Parser)
//!   for [context-free grammars](grammar::Cfg), with a
//!   [text format](parser::grammar) for grammars
//! * [Simulating pushdown automata](pda) by final state or by empty
//!   stack, with a configurable search budget
//! * [Tokenising source text](lexer::Lexer) with one DFA per token kind
//!   and longest-match semantics

pub mod dfa;
pub mod dset;
pub mod grammar;
pub mod label;
pub mod lexer;
pub mod nfa;
pub mod parser;
pub mod pda;
pub mod regex;
pub mod table;

pub use label::Label;

#[cfg(test)]
mod tests;
