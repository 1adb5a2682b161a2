//! # Grammar text parser
//! This module contains the parser for the grammar text format. A
//! grammar file is a list of rules, one per line, of the form
//!
//! ```text
//! S -> a S b | ε
//! ```
//!
//! The head of the first rule is the start variable. Symbols are
//! whitespace-separated; `|` separates alternatives, `->` (or `→`)
//! separates a head from its alternatives, and `ε` (or `eps`) denotes the
//! empty body. Comments are started by `#`, and lines containing only
//! whitespace or comments are ignored. Parsing is done in two steps: this
//! module produces a [ParsedGrammar], and converting it into a
//! [Cfg](crate::grammar::Cfg) with [TryInto] resolves the symbols (all
//! rule heads become variables, every other single-character token a
//! terminal).
//!
//! ```
//! use machina::grammar::Cfg;
//! use machina::grammar::ll1::Ll1Parser;
//!
//! let grammar = "
//!     ## matching pairs
//!     S -> a S b | ε
//! ";
//! let cfg: Cfg = machina::parser::grammar(grammar).unwrap().try_into().unwrap();
//! let parser = Ll1Parser::new(cfg).unwrap();
//! assert!(parser.parse("aaabbb"));
//! assert!(!parser.parse("aabbb"));
//! ```

mod grammar;

use nom::{combinator::all_consuming, error::Error, Finish};

/// A grammar as parsed from text, before symbol resolution
#[derive(Debug)]
pub struct ParsedGrammar<'a> {
    pub rules: Vec<ParsedRule<'a>>,
}

/// One parsed rule: a head and its `|`-separated alternatives
#[derive(Debug)]
pub struct ParsedRule<'a> {
    pub head: &'a str,
    pub alternatives: Vec<Vec<&'a str>>,
}

/// Parses a grammar according to the format above. The whole string must
/// be parsable, otherwise this function errors. Note that the result is a
/// [ParsedGrammar], which is not yet checked to be a valid
/// [Cfg](crate::grammar::Cfg); use [TryInto::try_into] for that second
/// step.
pub fn grammar(input: &str) -> Result<ParsedGrammar, Error<&str>> {
    all_consuming(grammar::full_grammar)(input)
        .finish()
        .map(|(_, grammar)| grammar)
}
